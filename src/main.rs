use GeoSorb::cli::cli_main::run;
use log::error;

fn main() {
    if let Err(e) = run() {
        error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
