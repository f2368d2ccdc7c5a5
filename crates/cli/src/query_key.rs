use clap::Args;

#[derive(Args, Debug, Clone)]
pub struct QueryKeyArgs {
    /// Path template, e.g. /pets/{petId}
    #[arg(long)]
    pub path: String,
    /// Variables object as JSON
    #[arg(long, default_value = "{}")]
    pub variables: String,
}

pub fn run(args: QueryKeyArgs) -> i32 {
    match render(&args) {
        Ok(key) => {
            println!("{key}");
            0
        }
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}

fn render(args: &QueryKeyArgs) -> Result<String, String> {
    let variables: serde_json::Value = serde_json::from_str(&args.variables)
        .map_err(|err| format!("Invalid --variables JSON: {err}"))?;
    let key = rqgen_core::build_query_key(&args.path, &variables);
    serde_json::to_string(&key).map_err(|err| err.to_string())
}
