/// clap front end and the interactive menu
pub mod cli_main;
/// `geosorb iast`
pub mod cli_iast;
/// `geosorb render`
pub mod cli_render;
