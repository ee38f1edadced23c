// Copyright @yucwang 2021

pub mod bsdf;
pub mod emitter;
pub mod integrator;
pub mod interaction;
pub mod photon_map;
pub mod rng;
pub mod scene;
pub mod sensor;
pub mod shape;
pub mod tangent_frame;
