/// terminal logger setup
pub mod logging;
/// locating rendered animations and opening them with the OS viewer
pub mod show_this_pic;
