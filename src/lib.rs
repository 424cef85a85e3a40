//! GeoSorb: two small pipelines.
//!
//! * [`Animation`] builds the three-part animation of matrix rank (full rank in the plane,
//!   rank deficiency in 2D and 3D) from text, lines, arrows and polygons and writes it as a GIF.
//! * [`Adsorption`] fits pure-component isotherms, solves Ideal Adsorbed Solution Theory for
//!   a binary gas mixture over a total-pressure sweep and reports the mixture loadings.
#[allow(non_snake_case)]
pub mod Adsorption;
#[allow(non_snake_case)]
pub mod Animation;
#[allow(non_snake_case)]
pub mod Utils;
pub mod cli;
pub mod errors;
pub mod gui;
pub mod settings;
