use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "datachat", about = "Conversational data assistant", version)]
pub struct Cli {
    /// Address to bind the HTTP server to.
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind the HTTP server to.
    #[arg(long)]
    pub port: Option<u16>,

    /// Large language model to use.
    #[arg(long)]
    pub model: Option<String>,

    /// Directory where plot artifacts are written.
    #[arg(long = "plot-dir")]
    pub plot_dir: Option<String>,

    /// Directory where uploaded files are stored.
    #[arg(long = "upload-dir")]
    pub upload_dir: Option<String>,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
