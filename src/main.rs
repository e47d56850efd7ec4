use clap::Parser;
use colored::Colorize;

use askme::cli::Cli;
use askme::errors::AskmeError;

#[actix_web::main]
async fn main() {
    let args = Cli::parse();

    if let Err(e) = askme::runtime::run(args).await {
        match e.downcast_ref::<AskmeError>() {
            Some(err) => eprintln!("{}", err.format_colored()),
            None => eprintln!("{} {:#}", "Error:".red().bold(), e),
        }
        std::process::exit(1);
    }
}
