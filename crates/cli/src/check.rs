use clap::Args;

use crate::common::{InputArgs, LoweredGroup, load_inputs, lower_service, run_cli};

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

pub fn run(args: &CheckArgs) -> i32 {
    run_cli(|| run_inner(args))
}

fn run_inner(args: &CheckArgs) -> Result<(), String> {
    let (ctx, service) = load_inputs(&args.input)?;
    let groups = lower_service(&ctx, &service, true)?;
    for line in summarize(&groups) {
        println!("{line}");
    }
    Ok(())
}

/// One line per operation, then a total.
fn summarize(groups: &[LoweredGroup]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut variants = 0;
    let mut operations = 0;
    for group in groups {
        let prefix = if group.group.is_empty() {
            "<client>"
        } else {
            group.group.as_str()
        };
        for lowered in &group.operations {
            let rest_call = &lowered.rest_call;
            lines.push(format!(
                "{prefix}.{}: {} {} -> {:?}, {} variant(s)",
                rest_call.name,
                rest_call.http_method.as_str(),
                rest_call.url_path,
                rest_call.category,
                lowered.variants.len()
            ));
            variants += lowered.variants.len();
            operations += 1;
        }
    }
    lines.push(format!(
        "{} group(s), {operations} operation(s), {variants} method variant(s)",
        groups.len()
    ));
    lines
}
