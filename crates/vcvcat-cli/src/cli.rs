use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "vcvcat",
    about = "Combine two VCV Rack patches into a new one",
    long_about = "Combine two VCV Rack patches into a new one.\n\n\
                  The modules of the second patch are placed below those of the first, \
                  and its module and cable ids are renumbered where they clash. \
                  Merge more than two patches by chaining invocations.",
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    /// First input file name
    pub in1: PathBuf,
    /// Second input file name
    pub in2: PathBuf,
    /// Output file name (must not exist yet)
    pub out: PathBuf,
}
