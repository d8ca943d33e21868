use std::fs;
use std::path::PathBuf;

use clap::Args;
use tracing::debug;

use crate::common::{InputArgs, load_inputs, lower_service, run_cli};

#[derive(Args, Debug, Clone)]
pub struct LowerArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[arg(long, help = "Lower the operations of each group in parallel")]
    pub parallel: bool,

    #[arg(
        long,
        short = 'o',
        value_name = "OUTPUT",
        help = "Write JSON to this file instead of stdout"
    )]
    pub output: Option<PathBuf>,
}

pub fn run(args: &LowerArgs) -> i32 {
    run_cli(|| run_inner(args))
}

fn run_inner(args: &LowerArgs) -> Result<(), String> {
    let (ctx, service) = load_inputs(&args.input)?;
    let groups = lower_service(&ctx, &service, args.parallel)?;
    let json = serde_json::to_string_pretty(&groups)
        .map_err(|err| format!("Failed to serialize lowered operations: {err}"))?;

    match &args.output {
        Some(path) => {
            fs::write(path, format!("{json}\n"))
                .map_err(|err| format!("Failed to write {}: {err}", path.display()))?;
            debug!(path = %path.display(), groups = groups.len(), "Wrote lowered operations.");
        }
        None => println!("{json}"),
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::common::tests::write_inputs;
    use tempfile::TempDir;

    fn lower_to_json(settings: Option<&str>, parallel: bool) -> serde_json::Value {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("lowered.json");
        let args = LowerArgs {
            input: write_inputs(&dir, settings),
            parallel,
            output: Some(output.clone()),
        };
        run_inner(&args).unwrap();
        serde_json::from_str(&fs::read_to_string(output).unwrap()).unwrap()
    }

    #[test]
    fn test_lower_writes_every_group() {
        let json = lower_to_json(None, false);
        let groups = json.as_array().unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0]["group"], "Widgets");

        let names: Vec<&str> = groups[0]["operations"]
            .as_array()
            .unwrap()
            .iter()
            .map(|op| op["restCall"]["name"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec!["getByResourceGroup", "list", "createOrUpdate", "listByTag", "delete"]
        );

        let upload = &groups[1]["operations"][0]["restCall"];
        assert_eq!(upload["name"], "uploadBlob");
        assert_eq!(upload["parameters"][1]["variableName"], "contentLength");
    }

    #[test]
    fn test_parallel_output_matches_sequential() {
        assert_eq!(lower_to_json(None, true), lower_to_json(None, false));
    }

    #[test]
    fn test_settings_change_output() {
        let json = lower_to_json(
            Some("[conventions]\npaging = false\nlong-running = false\ncloud-error = false\n"),
            false,
        );
        let operations = &json[0]["operations"];
        assert_eq!(operations[1]["restCall"]["category"], "simple");
        assert_eq!(operations[2]["restCall"]["category"], "simple");
        assert_eq!(
            operations[0]["restCall"]["exceptionType"],
            "CloudErrorException"
        );
    }

    #[test]
    fn test_missing_description_fails() {
        let dir = TempDir::new().unwrap();
        let args = LowerArgs {
            input: InputArgs {
                description: dir.path().join("missing.json"),
                settings: None,
            },
            parallel: false,
            output: None,
        };
        assert_eq!(run(&args), 1);
    }
}
