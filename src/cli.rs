use clap::{Parser, ValueEnum};
use transport_plots::naming::NamingScheme;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameBy {
    Run,
    Material,
}

impl From<NameBy> for NamingScheme {
    fn from(value: NameBy) -> Self {
        match value {
            NameBy::Run => NamingScheme::Run,
            NameBy::Material => NamingScheme::Material,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Analyse the simulation results.")]
pub struct Args {
    /// Run descriptor (JSON) the simulation was launched with
    #[arg(value_name = "CONFIGURATION")]
    pub configuration: String,

    /// The run swept a single geometry: skip the probability plot
    #[arg(long, default_value_t = false)]
    pub no_multiple_geometries: bool,

    /// Path to plot settings TOML; written with commented defaults if missing
    #[arg(long, default_value = "plots.toml")]
    pub settings: String,

    /// Output root holding run directories (overrides settings)
    #[arg(long)]
    pub out: Option<String>,

    /// Name figures by run or by material parameters (overrides settings)
    #[arg(long, value_enum)]
    pub name_by: Option<NameBy>,
}
