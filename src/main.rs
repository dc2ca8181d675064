#[cfg(target_arch = "wasm32")]
fn main() {
    console_error_panic_hook::set_once();
    mapquiz::wasm::init_logging();
    mapquiz::wasm::mount();
}

/// Checks a dataset directory the way the browser app would load it.
#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use std::process::ExitCode;

    let root = std::env::args().nth(1).unwrap_or_else(|| "data".to_string());

    let dataset = match mapquiz::load_dataset(&root) {
        Ok(dataset) => dataset,
        Err(error) => {
            eprintln!("{error}");
            return ExitCode::FAILURE;
        }
    };

    println!("{root}: {} features", dataset.catalog.len());
    for feature in dataset.catalog.features() {
        println!("  {feature}: {}", feature.accepted_answers.join(", "));
    }
    if dataset.manifest.is_none() {
        println!("no {}, using the default plan", mapquiz::MANIFEST_FILE);
    }
    for (index, question) in dataset.flow.questions().iter().enumerate() {
        println!(
            "question {}: level {}, {} features",
            index + 1,
            question.level.number(),
            question.catalog.len()
        );
    }

    ExitCode::SUCCESS
}
