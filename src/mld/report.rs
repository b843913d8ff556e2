//! Plain-text listing of a logical schema.

use super::{LogicalTable, NameResolver};
use crate::measure::{max_width, push_padded};
use crate::stats::SchemaStatistics;

/// Render `tables` as an indented listing, one block per table:
///
/// ```text
/// COMMANDE (entity)
///     id_commande          INT  PK, NOT NULL
///     fk_client_id_client  INT  FK, NOT NULL  -> client.id_client
/// ```
///
/// followed by a summary line. Column names go through `names`.
pub fn render(tables: &[LogicalTable], names: &dyn NameResolver) -> String {
    let mut output = String::new();

    if tables.is_empty() {
        output.push_str("No tables to display. Create entities in the MCD first.\n");
        return output;
    }

    for (i, table) in tables.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        render_table(&mut output, table, names);
    }

    let stats = SchemaStatistics::of(tables);
    output.push_str(&format!(
        "\nTables: {} | Columns: {} | Primary Keys: {} | Foreign Keys: {}\n",
        stats.tables, stats.columns, stats.primary_keys, stats.foreign_keys
    ));
    output
}

fn render_table(output: &mut String, table: &LogicalTable, names: &dyn NameResolver) {
    output.push_str(&format!("{} ({})\n", table.name.to_uppercase(), table.source_kind));

    let rows: Vec<[String; 4]> = table
        .columns
        .iter()
        .map(|column| {
            let mut flags = Vec::new();
            if column.is_primary_key {
                flags.push("PK");
            }
            if column.is_foreign_key {
                flags.push("FK");
            }
            if !column.is_nullable {
                flags.push("NOT NULL");
            }
            let target = match &column.references {
                Some(r) => format!(
                    "-> {}.{}",
                    r.table,
                    names.resolve(&r.table, &r.column)
                ),
                None => String::new(),
            };
            [
                names.resolve(&table.name, &column.name),
                column.data_type.clone(),
                flags.join(", "),
                target,
            ]
        })
        .collect();

    let widths: [usize; 3] = std::array::from_fn(|i| max_width(rows.iter().map(|r| r[i].as_str())));

    for row in &rows {
        let mut line = String::from("    ");
        push_padded(&mut line, &row[0], widths[0] + 2);
        push_padded(&mut line, &row[1], widths[1] + 2);
        push_padded(&mut line, &row[2], widths[2] + 2);
        line.push_str(&row[3]);
        output.push_str(line.trim_end());
        output.push('\n');
    }
}
