/// Render two aligned columns, keys padded to the widest key.
#[must_use]
pub fn render_key_value_table(rows: &[Vec<String>]) -> String {
    let key_width = rows
        .iter()
        .filter_map(|row| row.first())
        .map(String::len)
        .max()
        .unwrap_or(0)
        .max(3);

    let header = format!("{:<key_width$}  value", "key");
    let divider = "-".repeat(header.len());
    let lines = rows.iter().map(|row| {
        let key = row.first().map_or("-", String::as_str);
        let value = row.get(1).map_or("-", String::as_str);
        format!("{key:<key_width$}  {value}")
    });

    std::iter::once(header)
        .chain(std::iter::once(divider))
        .chain(lines)
        .collect::<Vec<_>>()
        .join("\n")
}
