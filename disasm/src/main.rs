mod logger;

use beebdis::{split_definition, Config, Error, Number};
use std::fs::File;
use std::io::{BufWriter, Write};

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Program image to disassemble
    input: String,

    /// Output file [default: stdout]
    #[clap(short, long)]
    output: Option<String>,

    /// Buffer offset of the first byte to disassemble
    #[clap(long)]
    offset: Option<String>,

    /// Number of bytes to disassemble [default: rest of the file]
    #[clap(long)]
    length: Option<String>,

    /// Load address of the image, e.g. &1900
    #[clap(short, long)]
    load: Option<String>,

    /// Address that must be decoded as code (repeatable)
    #[clap(short, long = "code")]
    code: Vec<String>,

    /// Symbol definition NAME=VALUE (repeatable)
    #[clap(long = "var")]
    vars: Vec<String>,

    /// YAML config file; command-line values take precedence
    #[clap(long)]
    config: Option<String>,

    /// Increase log verbosity
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn config(&self) -> Result<Config, Error> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        let mut cli = Config {
            offset: self.offset.clone().map(Number::Text),
            length: self.length.clone().map(Number::Text),
            load: self.load.clone().map(Number::Text),
            code: self.code.iter().cloned().map(Number::Text).collect(),
            ..Config::default()
        };
        for def in &self.vars {
            let (name, literal) = split_definition(def)?;
            cli.vars
                .insert(name.to_string(), Number::Text(literal.to_string()));
        }
        config.merge(cli);
        Ok(config)
    }
}

fn run(args: &Args) -> Result<(), Error> {
    let config = args.config()?;
    let bytes =
        std::fs::read(&args.input).map_err(|err| Error::FileOpen(args.input.clone(), err))?;
    log::debug!("read {} bytes from {}", bytes.len(), args.input);

    let disasm = config.build(&bytes)?;
    // Fail on a bad window before the output file is created.
    disasm.analyse()?;

    match &args.output {
        Some(path) => {
            let file = File::create(path).map_err(|err| Error::FileCreate(path.clone(), err))?;
            let mut w = BufWriter::new(file);
            disasm.disassemble(&mut w)?;
            w.flush()?;
            log::info!("wrote {}", path);
        }
        None => {
            let stdout = std::io::stdout();
            let mut w = BufWriter::new(stdout.lock());
            disasm.disassemble(&mut w)?;
            w.flush()?;
        }
    }
    Ok(())
}

fn main() {
    use clap::Parser;

    let args = Args::parse();
    logger::init(args.verbose);

    if let Err(err) = run(&args) {
        err.print_diag();
        std::process::exit(1);
    }
}
