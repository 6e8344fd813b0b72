use crate::demo::{run_demo, run_evaluate, DemoArgs, EvaluateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use competency_eval::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Competency Evaluation",
    about = "Score workers against the competency rubric and export signed evaluations",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run one evaluation offline from CSV scores and evidence files
    Evaluate(EvaluateArgs),
    /// Score the seeded furnace team end to end and write both exports
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Evaluate(args) => run_evaluate(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["competency-eval"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn evaluate_requires_evidence_arguments() {
        let result = Cli::try_parse_from([
            "competency-eval",
            "evaluate",
            "--login",
            "marlon@empresa.com",
            "--secret",
            "123",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn evaluate_parses_full_invocation() {
        let cli = Cli::try_parse_from([
            "competency-eval",
            "evaluate",
            "--login",
            "marlon@empresa.com",
            "--secret",
            "123",
            "--scores",
            "scores.csv",
            "--photo",
            "photo.jpg",
            "--signature",
            "signature.png",
            "--full-name",
            "Marlon Ruiz",
            "--yes",
        ])
        .expect("parses");

        let Some(Command::Evaluate(args)) = cli.command else {
            panic!("expected evaluate command");
        };
        assert!(args.yes);
        assert_eq!(args.full_name, "Marlon Ruiz");
        assert!(args.sub_unit.is_none());
    }
}
