use bommerge::cli::{Cli, Commands};
use clap::Parser;
use miette::Result;

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    bommerge::logging::init_logging(global.verbose, global.quiet);

    match cli.command {
        Commands::Merge(args) => bommerge::cli::commands::merge::run(args, &global),
        Commands::Value(args) => bommerge::cli::commands::value::run(args, &global),
        Commands::Classify(args) => bommerge::cli::commands::classify::run(args, &global),
        Commands::Inventory(args) => bommerge::cli::commands::inventory::run(args, &global),
        Commands::Completions(args) => bommerge::cli::commands::completions::run(args),
    }
}
