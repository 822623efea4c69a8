use std::ffi::OsString;

fn main() {
    let args: Vec<OsString> = std::env::args_os().collect();
    if let Err(err) = dashcal_cli::run(args) {
        if let Some(clap_err) = err.downcast_ref::<clap::Error>() {
            clap_err.exit();
        }
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
