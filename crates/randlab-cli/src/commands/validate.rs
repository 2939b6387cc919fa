use randlab_core::GenerationMethod;

pub fn run(method: &str, params: &[String], json: bool, output_path: Option<&str>) {
    let params = super::parse_params(params);
    let method =
        GenerationMethod::from_parameters(method, &params).unwrap_or_else(|e| super::fail(e));
    let result = randlab_core::validate(&method);

    if json {
        super::emit_json(&result, true, output_path);
        return;
    }

    println!("🔍 {method}");
    println!();
    if !result.is_applicable() {
        println!("   (no conditions apply)");
    }
    for condition in &result.conditions {
        let mark = if condition.satisfied { "✓" } else { "✗" };
        println!("   {mark} {}", condition.name);
        println!("       {}", condition.description);
        if let Some(details) = &condition.details {
            println!("       {details}");
        }
    }
    println!();
    let verdict = if result.all_satisfied {
        "ALL SATISFIED"
    } else {
        "NOT SATISFIED"
    };
    println!("   {verdict}: {}", result.explanation);

    if output_path.is_some() {
        super::emit_json(&result, false, output_path);
    }
}
