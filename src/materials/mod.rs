// Copyright @yucwang 2023

pub mod glass;
pub mod lambertian;
pub mod mirror;
