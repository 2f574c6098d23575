use std::env;

fn print_usage() {
    eprintln!("Usage: tug [OPTIONS] <url> [output]");
    eprintln!();
    eprintln!("Downloads a file over HTTP(S), resuming a partial download");
    eprintln!("when the server supports byte ranges.");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  <url>               URL of the file to download");
    eprintln!("  [output]            Destination file or directory (default: .)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --no-resume         Always restart from offset 0");
    eprintln!("  -q, --quiet         Suppress the progress line");
    eprintln!("  -d, --dir <DIR>     Base directory for relative outputs (default: .)");
    eprintln!("  -H, --header <H>    Extra request header, 'Name: value' (repeatable)");
    eprintln!("  -h, --help          Show this help");
}

#[tokio::main]
async fn main() -> tug_dl::Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() || args.iter().any(|a| a == "-h" || a == "--help") {
        print_usage();
        std::process::exit(if args.is_empty() { 2 } else { 0 });
    }

    #[cfg(feature = "cli")]
    {
        tug_dl::cli::run().await
    }
    #[cfg(not(feature = "cli"))]
    {
        eprintln!("CLI support not compiled in");
        std::process::exit(1);
    }
}
