// Export Writer — serializes matrix, current stats and change history
// Writes <dir>/matrix-analysis-{timestamp}.json

use matrix_workbench::AnalysisSession;
use std::path::{Path, PathBuf};

pub fn write_document(session: &AnalysisSession, dir: &Path) -> std::io::Result<PathBuf> {
    let document = session.export_document();
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
    }
    let path = dir.join(format!("matrix-analysis-{}.json", document.timestamp));
    let json = serde_json::to_string_pretty(&document)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    std::fs::write(&path, json)?;
    Ok(path)
}
