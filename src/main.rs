// Copyright 2020 TwoCookingMice

#![allow(dead_code)]

pub extern crate nalgebra as na;

mod core;
mod emitters;
mod integrators;
mod io;
mod materials;
mod math;
mod renderers;
mod scenes;
mod sensors;
mod shapes;

use self::core::integrator::Integrator;
use self::core::rng::LcgRng;
use self::integrators::photon_mapping::{PhotonMappingConfig, PhotonMappingIntegrator};
use self::io::exr_utils;
use self::renderers::simple::{Renderer, SimpleRenderer};

use std::env;

fn main() {
    env::set_var("RUST_LOG", "info");
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!(
            "Usage: {} <output.exr> [--width N] [--height N] [--spp N] \
             [--photons N] [--estimation N] [--caustics-photons N] \
             [--caustics-estimation N] [--gathering-depth N] [--max-depth N] [--seed N]",
            args[0]
        );
        std::process::exit(1);
    }

    let output_path = &args[1];
    let mut width: usize = 512;
    let mut height: usize = 512;
    let mut spp: u32 = 16;
    let mut n_photons_global: usize = 100000;
    let mut n_estimation_global: usize = 100;
    let mut n_photons_caustics: usize = 1000000;
    let mut n_estimation_caustics: usize = 100;
    let mut final_gathering_depth: u32 = 4;
    let mut max_depth: u32 = 100;
    let mut seed: u64 = 0;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--width" => {
                i += 1;
                width = args.get(i).and_then(|v| v.parse().ok()).unwrap_or(width);
            }
            "--height" => {
                i += 1;
                height = args.get(i).and_then(|v| v.parse().ok()).unwrap_or(height);
            }
            "--spp" => {
                i += 1;
                spp = args.get(i).and_then(|v| v.parse().ok()).unwrap_or(spp);
            }
            "--photons" => {
                i += 1;
                n_photons_global = args.get(i).and_then(|v| v.parse().ok())
                    .unwrap_or(n_photons_global);
            }
            "--estimation" => {
                i += 1;
                n_estimation_global = args.get(i).and_then(|v| v.parse().ok())
                    .unwrap_or(n_estimation_global);
            }
            "--caustics-photons" => {
                i += 1;
                n_photons_caustics = args.get(i).and_then(|v| v.parse().ok())
                    .unwrap_or(n_photons_caustics);
            }
            "--caustics-estimation" => {
                i += 1;
                n_estimation_caustics = args.get(i).and_then(|v| v.parse().ok())
                    .unwrap_or(n_estimation_caustics);
            }
            "--gathering-depth" => {
                i += 1;
                final_gathering_depth = args.get(i).and_then(|v| v.parse().ok())
                    .unwrap_or(final_gathering_depth);
            }
            "--max-depth" => {
                i += 1;
                max_depth = args.get(i).and_then(|v| v.parse().ok()).unwrap_or(max_depth);
            }
            "--seed" => {
                i += 1;
                seed = args.get(i).and_then(|v| v.parse().ok()).unwrap_or(seed);
            }
            _ => {}
        }
        i += 1;
    }

    let scene = scenes::cornell_box();
    let mut sensor = scenes::cornell_box_camera(width, height);

    let config = PhotonMappingConfig {
        n_photons_global,
        n_estimation_global,
        n_photons_caustics,
        n_estimation_caustics,
        final_gathering_depth,
        max_depth,
    };
    let mut integrator = PhotonMappingIntegrator::new(config, spp);
    let mut rng = LcgRng::new(seed.wrapping_add(1));
    integrator.build(&scene, &mut rng);

    let renderer = SimpleRenderer::new(Box::new(integrator), seed);
    let image = renderer.render(&scene, &mut sensor);
    exr_utils::write_exr_to_file(&image, output_path);
}
