use clap::Parser;

/// PiBackbone - A tool for installing the basic required subsystems on a Pi-based project
#[derive(Parser, Debug)]
#[command(name = "PiBackbone")]
#[command(about = "PiBackbone - A tool for installing the basic required subsystems on a Pi-based project")]
#[command(version)]
pub struct Cli {}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}
