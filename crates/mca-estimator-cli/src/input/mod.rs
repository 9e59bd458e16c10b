pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Load a request from `--input <file.json>`, falling back to JSON piped on
/// stdin. `None` when neither source is present.
pub fn load_request<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return file::read_json(path).map(Some);
    }
    stdin::read_stdin()
}
