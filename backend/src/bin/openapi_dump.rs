//! Print the tracker OpenAPI document as JSON, or YAML with `--yaml`.

use tracker::doc::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let doc = ApiDoc::openapi();
    let yaml = std::env::args().skip(1).any(|arg| arg == "--yaml");
    let rendered = if yaml {
        doc.to_yaml()?
    } else {
        doc.to_pretty_json()?
    };
    println!("{rendered}");
    Ok(())
}
