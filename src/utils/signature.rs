pub fn get_signature(version: &str) -> String {
    format!(
        r#"
   .-------------.
   | [general]   |      qgismeta (QGIS plugin metadata.txt toolkit)
   | name=...    |
   | version=... |      Read, validate, render and bump plugin descriptors.
   '-------------'
                        v{}
"#,
        version
    )
}
