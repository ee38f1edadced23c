// Copyright @yucwang 2026

use crate::core::bsdf::BxDFType;
use crate::core::emitter::Emitter;
use crate::core::integrator::{cos_term, Integrator, TransportDirection};
use crate::core::interaction::SurfaceIntersection;
use crate::core::photon_map::{Photon, PhotonMap};
use crate::core::rng::LcgRng;
use crate::core::scene::Scene;
use crate::math::constants::{Float, EPSILON, PI, RAY_EPSILON, Vector3f};
use crate::math::ray::Ray3f;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

// Below this camera depth every specular lobe is enumerated instead of
// sampled, which removes the Fresnel-splitting noise where it is most
// visible.
const SPECULAR_SPLIT_DEPTH: u32 = 3;

/// Immutable parameter bundle of the photon mapping integrator, fixed at
/// construction.
#[derive(Debug, Clone, Copy)]
pub struct PhotonMappingConfig {
    /// Photons emitted for the global photon map.
    pub n_photons_global: usize,
    /// Neighborhood size of global-map density estimates.
    pub n_estimation_global: usize,
    /// Photons emitted for the caustics photon map.
    pub n_photons_caustics: usize,
    /// Neighborhood size of caustics-map density estimates.
    pub n_estimation_caustics: usize,
    /// Camera depth below which diffuse hits get the full direct + caustics
    /// + final gathering treatment.
    pub final_gathering_depth: u32,
    /// Maximum depth of photon tracing and eye tracing.
    pub max_depth: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DepositPolicy {
    /// Deposit on every diffuse hit and keep walking.
    Global,
    /// Deposit only on a diffuse hit preceded by a specular chain, then stop.
    Caustics,
}

/// Unbiased stochastic termination: continue a walk with probability
/// `min(max channel, 1)` and divide the throughput by it so the expected
/// value is preserved.
pub(crate) fn russian_roulette(throughput: Vector3f, u: Float) -> Option<Vector3f> {
    let prob = throughput.x.max(throughput.y).max(throughput.z).min(1.0);
    if u >= prob {
        return None;
    }
    Some(throughput / prob)
}

fn throughput_is_valid(throughput: &Vector3f) -> bool {
    throughput.iter().all(|c| c.is_finite() && *c >= 0.0)
}

/// Classical two-map photon mapping with final gathering: a global and a
/// caustics photon map are populated by backward random walks from the
/// lights, then camera rays combine next-event estimation, caustics density
/// estimation and a final gather over the global map.
pub struct PhotonMappingIntegrator {
    config: PhotonMappingConfig,
    samples_per_pixel: u32,
    global_map: Option<PhotonMap>,
    caustics_map: Option<PhotonMap>,
    built: bool,
}

impl PhotonMappingIntegrator {
    pub fn new(config: PhotonMappingConfig, samples_per_pixel: u32) -> Self {
        Self {
            config,
            samples_per_pixel,
            global_map: None,
            caustics_map: None,
            built: false,
        }
    }

    pub fn config(&self) -> &PhotonMappingConfig {
        &self.config
    }

    pub fn global_map(&self) -> Option<&PhotonMap> {
        self.global_map.as_ref()
    }

    pub fn caustics_map(&self) -> Option<&PhotonMap> {
        self.caustics_map.as_ref()
    }

    // Sample the initial ray leaving a light together with its
    // importance-weighted power.
    fn sample_ray_from_light(&self, scene: &Scene, rng: &mut LcgRng)
                             -> Option<(Ray3f, Vector3f)> {
        let (emitter, pdf_choice) = scene.sample_emitter(rng)?;
        let (point, pdf_pos) = emitter.sample_point(rng);
        let (dir, pdf_dir) = emitter.sample_direction(&point, rng);
        if pdf_choice <= 0.0 || pdf_pos <= 0.0 || pdf_dir <= 0.0 {
            return None;
        }

        let le = emitter.le(&point, &dir);
        let cos = dir.dot(&point.normal).abs();
        let throughput = le * (cos / (pdf_choice * pdf_pos * pdf_dir));
        let ray = Ray3f::new(point.position, dir, Some(RAY_EPSILON), None);
        Some((ray, throughput))
    }

    // One backward random walk from a light. Deposits into `out` according
    // to `policy`; numeric faults abort the walk and are counted.
    fn trace_walk(&self, scene: &Scene, rng: &mut LcgRng, policy: DepositPolicy,
                  out: &mut Vec<Photon>, faults: &AtomicUsize) {
        let (mut ray, mut throughput) = match self.sample_ray_from_light(scene, rng) {
            Some(sample) => sample,
            None => return,
        };

        let mut prev_specular = false;
        for bounce in 0..self.config.max_depth {
            if !throughput_is_valid(&throughput) {
                log::error!("photon throughput is NaN or negative, discarding walk");
                faults.fetch_add(1, Ordering::Relaxed);
                return;
            }

            let info = match scene.ray_intersection(&ray) {
                Some(info) => info,
                // photon goes out to the sky
                None => return,
            };
            let material = match info.material() {
                Some(material) => material,
                None => return,
            };
            let wo = -ray.dir();

            match policy {
                DepositPolicy::Global => {
                    if material.bxdf_type() == BxDFType::Diffuse {
                        out.push(Photon::new(throughput, info.p(), wo));
                    }
                }
                DepositPolicy::Caustics => {
                    if material.bxdf_type() == BxDFType::Diffuse {
                        // A caustics photon is exactly one light-(specular)+-
                        // diffuse path; any other diffuse arrival belongs to
                        // the global map.
                        if prev_specular {
                            out.push(Photon::new(throughput, info.p(), wo));
                        }
                        return;
                    }
                    prev_specular = true;
                }
            }

            if bounce > 0 {
                throughput = match russian_roulette(throughput, rng.next_f32()) {
                    Some(survived) => survived,
                    None => return,
                };
            }

            let sample = match material.sample(&wo, &info, TransportDirection::FromLight, rng) {
                Some(sample) if sample.pdf > 0.0 => sample,
                _ => return,
            };
            let cos = cos_term(&wo, &sample.wi, &info, TransportDirection::FromLight);
            throughput = throughput.component_mul(&sample.value) * (cos / sample.pdf);
            ray = Ray3f::new(info.p(), sample.wi, Some(RAY_EPSILON), None);
        }
    }

    // Walks are data-parallel; each worker owns a private rng stream and a
    // private photon buffer, concatenated after the join barrier.
    fn trace_photons(&self, scene: &Scene, base_seed: u64, n_photons: usize,
                     policy: DepositPolicy) -> Vec<Photon> {
        let worker_count = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let faults = AtomicUsize::new(0);
        let mut photons: Vec<Photon> = Vec::with_capacity(n_photons);

        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(worker_count);
            for worker in 0..worker_count {
                let start = worker * n_photons / worker_count;
                let end = (worker + 1) * n_photons / worker_count;
                let faults = &faults;
                handles.push(scope.spawn(move || {
                    let mut rng = LcgRng::new(base_seed.wrapping_mul(worker as u64 + 1));
                    let mut local = Vec::new();
                    for _ in start..end {
                        self.trace_walk(scene, &mut rng, policy, &mut local, faults);
                    }
                    local
                }));
            }

            for handle in handles {
                photons.extend(handle.join().expect("photon tracing worker panicked"));
            }
        });

        let fault_count = faults.load(Ordering::Relaxed);
        if fault_count > 0 {
            log::warn!("{} photon walks discarded due to numeric faults", fault_count);
        }
        photons
    }

    // Disk-density approximation of reflected radiance from the k nearest
    // photons. An absent map or an empty neighborhood estimates zero.
    fn density_estimate(&self, map: &Option<PhotonMap>, k: usize, n_emitted: usize,
                        wo: &Vector3f, info: &SurfaceIntersection) -> Vector3f {
        let map = match map {
            Some(map) => map,
            None => return Vector3f::new(0.0, 0.0, 0.0),
        };
        let material = match info.material() {
            Some(material) => material,
            None => return Vector3f::new(0.0, 0.0, 0.0),
        };

        let (photon_indices, max_dist2) = map.query_k_nearest(&info.p(), k);
        if photon_indices.is_empty() || max_dist2 <= 0.0 {
            return Vector3f::new(0.0, 0.0, 0.0);
        }

        let mut lo = Vector3f::new(0.0, 0.0, 0.0);
        for photon_index in photon_indices {
            let photon = map.photon(photon_index);
            let f = material.eval(wo, &photon.wi, info, TransportDirection::FromCamera);
            lo += f.component_mul(&photon.throughput);
        }
        lo / (n_emitted as Float * PI * max_dist2)
    }

    // Next-event estimation toward one sampled light point.
    fn direct_illumination(&self, scene: &Scene, wo: &Vector3f,
                           info: &SurfaceIntersection, rng: &mut LcgRng) -> Vector3f {
        let (emitter, pdf_choice) = match scene.sample_emitter(rng) {
            Some(sample) => sample,
            None => return Vector3f::new(0.0, 0.0, 0.0),
        };
        let material = match info.material() {
            Some(material) => material,
            None => return Vector3f::new(0.0, 0.0, 0.0),
        };

        let (light_point, pdf_pos) = emitter.sample_point(rng);
        let to_light = light_point.position - info.p();
        let r2 = to_light.norm_squared();
        if r2 <= 0.0 || pdf_pos <= 0.0 {
            return Vector3f::new(0.0, 0.0, 0.0);
        }
        let r = r2.sqrt();
        let wi = to_light / r;

        // Convert the positional density to a directional one.
        let cos_light = (-wi).dot(&light_point.normal).abs();
        if cos_light < EPSILON {
            return Vector3f::new(0.0, 0.0, 0.0);
        }
        let pdf_dir = pdf_pos * r2 / cos_light;

        let shadow_ray = Ray3f::new(info.p(), wi, Some(RAY_EPSILON), Some(r - RAY_EPSILON));
        if scene.ray_intersection_t(&shadow_ray) {
            return Vector3f::new(0.0, 0.0, 0.0);
        }

        let le = emitter.le(&light_point, &-wi);
        let f = material.eval(wo, &wi, info, TransportDirection::FromCamera);
        let cos = wi.dot(&info.sh_normal()).abs();
        f.component_mul(&le) * (cos / (pdf_choice * pdf_dir))
    }

    fn final_gathering(&self, scene: &Scene, wo: &Vector3f,
                       info: &SurfaceIntersection, rng: &mut LcgRng) -> Vector3f {
        self.final_gathering_recursive(scene, wo, info, rng, 0)
    }

    // Single-sample gather: diffuse hits terminate into the global map,
    // specular hits recurse so light-(specular)+-diffuse chains still reach
    // the gather point.
    fn final_gathering_recursive(&self, scene: &Scene, wo: &Vector3f,
                                 info: &SurfaceIntersection, rng: &mut LcgRng,
                                 depth: u32) -> Vector3f {
        if depth >= self.config.max_depth {
            return Vector3f::new(0.0, 0.0, 0.0);
        }
        let material = match info.material() {
            Some(material) => material,
            None => return Vector3f::new(0.0, 0.0, 0.0),
        };

        let sample = match material.sample(wo, info, TransportDirection::FromCamera, rng) {
            Some(sample) if sample.pdf > 0.0 => sample,
            _ => return Vector3f::new(0.0, 0.0, 0.0),
        };
        let cos = sample.wi.dot(&info.sh_normal()).abs();
        let gather_ray = Ray3f::new(info.p(), sample.wi, Some(RAY_EPSILON), None);

        let gather_info = match scene.ray_intersection(&gather_ray) {
            Some(gather_info) => gather_info,
            None => return Vector3f::new(0.0, 0.0, 0.0),
        };
        let gather_material = match gather_info.material() {
            Some(gather_material) => gather_material,
            None => return Vector3f::new(0.0, 0.0, 0.0),
        };

        let gather_wo = -gather_ray.dir();
        let li = match gather_material.bxdf_type() {
            BxDFType::Diffuse => self.density_estimate(
                &self.global_map,
                self.config.n_estimation_global,
                self.config.n_photons_global,
                &gather_wo,
                &gather_info,
            ),
            BxDFType::Specular => {
                self.final_gathering_recursive(scene, &gather_wo, &gather_info, rng, depth + 1)
            }
        };
        sample.value.component_mul(&li) * (cos / sample.pdf)
    }

    fn integrate_recursive(&self, ray: &Ray3f, scene: &Scene, rng: &mut LcgRng,
                           depth: u32) -> Vector3f {
        if depth >= self.config.max_depth {
            return Vector3f::new(0.0, 0.0, 0.0);
        }

        let info = match scene.ray_intersection(ray) {
            Some(info) => info,
            // ray goes out to the sky
            None => return Vector3f::new(0.0, 0.0, 0.0),
        };
        let wo = -ray.dir();

        // when directly hitting a light
        if info.is_emissive() {
            if wo.dot(&info.sh_normal()) > 0.0 {
                return info.le();
            }
            return Vector3f::new(0.0, 0.0, 0.0);
        }

        let material = match info.material() {
            Some(material) => material,
            None => return Vector3f::new(0.0, 0.0, 0.0),
        };

        match material.bxdf_type() {
            BxDFType::Diffuse => {
                if depth >= self.config.final_gathering_depth {
                    // Terminal estimate straight from the global map; biased
                    // but bounded by the gathering-depth cutoff.
                    self.density_estimate(
                        &self.global_map,
                        self.config.n_estimation_global,
                        self.config.n_photons_global,
                        &wo,
                        &info,
                    )
                } else {
                    let ld = self.direct_illumination(scene, &wo, &info, rng);
                    let lc = self.density_estimate(
                        &self.caustics_map,
                        self.config.n_estimation_caustics,
                        self.config.n_photons_caustics,
                        &wo,
                        &info,
                    );
                    let li = self.final_gathering(scene, &wo, &info, rng);
                    ld + lc + li
                }
            }
            BxDFType::Specular => {
                if depth >= SPECULAR_SPLIT_DEPTH {
                    let sample =
                        match material.sample(&wo, &info, TransportDirection::FromCamera, rng) {
                            Some(sample) if sample.pdf > 0.0 => sample,
                            _ => return Vector3f::new(0.0, 0.0, 0.0),
                        };
                    let next_ray = Ray3f::new(info.p(), sample.wi, Some(RAY_EPSILON), None);
                    let weight = sample.value
                        * (cos_term(&wo, &sample.wi, &info, TransportDirection::FromCamera)
                            / sample.pdf);
                    weight.component_mul(&self.integrate_recursive(&next_ray, scene, rng, depth + 1))
                } else {
                    // Enumerate every lobe at shallow depth to keep Fresnel
                    // splitting noise-free near the camera.
                    let mut lo = Vector3f::new(0.0, 0.0, 0.0);
                    for lobe in material.sample_all(&wo, &info, TransportDirection::FromCamera) {
                        let next_ray = Ray3f::new(info.p(), lobe.wi, Some(RAY_EPSILON), None);
                        let weight = lobe.value * lobe.wi.dot(&info.sh_normal()).abs();
                        lo += weight.component_mul(&self.integrate_recursive(
                            &next_ray, scene, rng, depth + 1,
                        ));
                    }
                    lo
                }
            }
        }
    }
}

impl Integrator for PhotonMappingIntegrator {
    fn build(&mut self, scene: &Scene, rng: &mut LcgRng) {
        assert!(!self.built, "photon maps are already built");

        let base_seed = ((rng.next_u32() as u64) << 32) | rng.next_u32() as u64;

        log::info!(
            "tracing {} photons for the global photon map",
            self.config.n_photons_global
        );
        let photons = self.trace_photons(
            scene,
            base_seed,
            self.config.n_photons_global,
            DepositPolicy::Global,
        );
        log::info!("building the global photon map from {} photons", photons.len());
        self.global_map = match PhotonMap::build(photons) {
            Ok(map) => Some(map),
            Err(err) => {
                log::warn!("global photon map left empty: {}", err);
                None
            }
        };

        // Caustics paths are unreachable without final gathering, so the
        // second map is only populated when gathering is enabled.
        if self.config.final_gathering_depth > 0 && self.config.n_photons_caustics > 0 {
            let caustics_seed = ((rng.next_u32() as u64) << 32) | rng.next_u32() as u64;
            log::info!(
                "tracing {} photons for the caustics photon map",
                self.config.n_photons_caustics
            );
            let photons = self.trace_photons(
                scene,
                caustics_seed,
                self.config.n_photons_caustics,
                DepositPolicy::Caustics,
            );
            log::info!("building the caustics photon map from {} photons", photons.len());
            self.caustics_map = match PhotonMap::build(photons) {
                Ok(map) => Some(map),
                Err(err) => {
                    log::warn!("caustics photon map left empty: {}", err);
                    None
                }
            };
        } else {
            log::info!("skipping the caustics photon map");
        }

        self.built = true;
    }

    fn integrate(&self, ray: &Ray3f, scene: &Scene, rng: &mut LcgRng) -> Vector3f {
        assert!(self.built, "integrate called before build");
        self.integrate_recursive(ray, scene, rng, 0)
    }

    fn samples_per_pixel(&self) -> u32 {
        self.samples_per_pixel
    }
}
