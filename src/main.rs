use clap::Parser;
use todo_lists::cli::{self, Cli};
use todo_lists::config::Settings;
use todo_lists::format::OutputContext;
use todo_lists::logging::init_logging;

fn main() {
    let args = Cli::parse();

    if let Err(e) = init_logging(args.verbose, args.quiet, args.log_file.as_deref()) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let settings = match Settings::load(&args.overrides()) {
        Ok(settings) => settings,
        Err(err) => {
            OutputContext::from_flags(args.json, args.quiet).error(&err);
            std::process::exit(err.exit_code());
        }
    };

    let ctx = OutputContext::from_flags(settings.json, args.quiet);
    if let Err(err) = cli::run(&args, &settings, &ctx) {
        ctx.error(&err);
        std::process::exit(err.exit_code());
    }
}
