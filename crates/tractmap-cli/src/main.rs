//! TractMap CLI - choropleth data pipeline for census tracts.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::FmtSubscriber;

fn main() {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.effective_log_level())
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: could not install logger: {}", e);
    }

    let result = match cli.command {
        Commands::Join {
            records,
            features,
            feature_key,
            record_key,
            attributes,
            zero_pad,
            output,
        } => commands::join::run(
            records,
            features,
            feature_key,
            record_key,
            attributes,
            zero_pad,
            output,
            cli.verbose,
        ),

        Commands::Nearest {
            origins,
            targets,
            id_property,
            unit,
            centroid,
            zero_pad,
            key_header,
            distance_header,
            output,
        } => commands::nearest::run(
            commands::nearest::NearestArgs {
                origins,
                targets,
                id_property,
                unit,
                centroid,
                zero_pad,
                key_header,
                distance_header,
                output,
            },
            cli.verbose,
        ),

        Commands::Classify {
            features,
            attribute,
            classes,
            method,
            json,
        } => commands::classify::run(features, attribute, classes, method, json, cli.verbose),

        Commands::Build {
            config,
            attribute,
            output,
            legend,
        } => commands::build::run(config, attribute, output, legend, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
