//! Hash de contenido de documentos: SHA-256 en hex minúsculas, el formato
//! que viaja en `Event.docHash`.

use sha2::{Digest, Sha256};

pub fn doc_hash(content: &[u8]) -> String {
    let digest = Sha256::digest(content);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}
