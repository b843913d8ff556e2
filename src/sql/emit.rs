//! DDL emission for a logical schema.

use std::collections::{HashMap, HashSet};
use std::fmt::Write;

use crate::measure::{max_width, push_padded};
use crate::mld::{LogicalTable, NameResolver};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SqlOptions {
    /// Start the script with a comment block.
    pub header: bool,
    /// Emit `CREATE TABLE IF NOT EXISTS`.
    pub if_not_exists: bool,
}

impl Default for SqlOptions {
    fn default() -> Self {
        Self {
            header: true,
            if_not_exists: false,
        }
    }
}

#[derive(Debug, Default)]
pub struct SqlEmitter {
    options: SqlOptions,
}

/// Foreign-key columns of one table pointing at the same target table.
struct ForeignKeyGroup<'t> {
    target: &'t str,
    columns: Vec<String>,
    target_columns: Vec<String>,
}

impl SqlEmitter {
    pub fn new(options: SqlOptions) -> Self {
        Self { options }
    }

    /// Render `tables` as `CREATE TABLE` statements, resolving every column
    /// name through `names`.
    ///
    /// Referenced tables are created first. Foreign keys that cannot be
    /// declared inline because of a reference cycle are added afterwards
    /// with `ALTER TABLE`.
    pub fn emit(&self, tables: &[LogicalTable], names: &dyn NameResolver) -> String {
        let mut sql = String::new();

        if self.options.header {
            writeln!(&mut sql, "-- Generated by merisql").unwrap();
            writeln!(&mut sql, "-- {} table(s)", tables.len()).unwrap();
            sql.push('\n');
        }

        let known: HashSet<&str> = tables.iter().map(|t| t.name.as_str()).collect();
        let mut created: HashSet<&str> = HashSet::new();
        let mut deferred: Vec<(&str, ForeignKeyGroup)> = Vec::new();

        for (i, &index) in creation_order(tables).iter().enumerate() {
            let table = &tables[index];
            if i > 0 {
                sql.push('\n');
            }

            let (inline, later): (Vec<_>, Vec<_>) = foreign_key_groups(table, names)
                .into_iter()
                .partition(|g| {
                    g.target == table.name || created.contains(g.target) || !known.contains(g.target)
                });

            self.emit_table(&mut sql, table, inline, names);
            created.insert(&table.name);
            deferred.extend(later.into_iter().map(|g| (table.name.as_str(), g)));
        }

        if !deferred.is_empty() {
            sql.push('\n');
            for (table, group) in deferred {
                writeln!(
                    &mut sql,
                    "ALTER TABLE {} ADD FOREIGN KEY ({}) REFERENCES {} ({});",
                    table,
                    group.columns.join(", "),
                    group.target,
                    group.target_columns.join(", ")
                )
                .unwrap();
            }
        }

        sql
    }

    fn emit_table(
        &self,
        sql: &mut String,
        table: &LogicalTable,
        foreign_keys: Vec<ForeignKeyGroup>,
        names: &dyn NameResolver,
    ) {
        if table.columns.is_empty() {
            writeln!(sql, "-- Table {} has no columns", table.name).unwrap();
            return;
        }

        let column_names: Vec<String> = table
            .columns
            .iter()
            .map(|c| names.resolve(&table.name, &c.name))
            .collect();
        let width = max_width(column_names.iter().map(String::as_str));

        let mut items: Vec<String> = table
            .columns
            .iter()
            .zip(&column_names)
            .map(|(column, name)| {
                let mut item = String::from("    ");
                push_padded(&mut item, name, width + 1);
                item.push_str(&column.data_type);
                if !column.is_nullable {
                    item.push_str(" NOT NULL");
                }
                item
            })
            .collect();

        let primary_keys: Vec<&str> = table
            .columns
            .iter()
            .zip(&column_names)
            .filter(|(c, _)| c.is_primary_key)
            .map(|(_, name)| name.as_str())
            .collect();
        if !primary_keys.is_empty() {
            items.push(format!("    PRIMARY KEY ({})", primary_keys.join(", ")));
        }

        for group in foreign_keys {
            items.push(format!(
                "    FOREIGN KEY ({}) REFERENCES {} ({})",
                group.columns.join(", "),
                group.target,
                group.target_columns.join(", ")
            ));
        }

        let if_not_exists = if self.options.if_not_exists {
            "IF NOT EXISTS "
        } else {
            ""
        };
        writeln!(sql, "CREATE TABLE {}{} (", if_not_exists, table.name).unwrap();
        sql.push_str(&items.join(",\n"));
        sql.push_str("\n);\n");
    }
}

/// Groups foreign-key columns by target table, in column order, so a
/// composite key is declared as one constraint. A target column seen twice
/// starts a new group (one constraint per role).
fn foreign_key_groups<'t>(table: &'t LogicalTable, names: &dyn NameResolver) -> Vec<ForeignKeyGroup<'t>> {
    let mut groups: Vec<ForeignKeyGroup<'t>> = Vec::new();
    for column in &table.columns {
        let Some(target) = &column.references else {
            continue;
        };
        let local = names.resolve(&table.name, &column.name);
        let remote = names.resolve(&target.table, &target.column);
        match groups
            .iter_mut()
            .find(|g| g.target == target.table && !g.target_columns.contains(&remote))
        {
            Some(group) => {
                group.columns.push(local);
                group.target_columns.push(remote);
            }
            None => groups.push(ForeignKeyGroup {
                target: &target.table,
                columns: vec![local],
                target_columns: vec![remote],
            }),
        }
    }
    groups
}

/// Table indices ordered so that referenced tables come before the tables
/// referencing them. Level 0 holds tables without outgoing references;
/// tables caught in a cycle go last. Within a level the input order is kept.
fn creation_order(tables: &[LogicalTable]) -> Vec<usize> {
    let index: HashMap<&str, usize> = tables
        .iter()
        .enumerate()
        .map(|(i, t)| (t.name.as_str(), i))
        .collect();

    let parents: Vec<HashSet<usize>> = tables
        .iter()
        .enumerate()
        .map(|(i, t)| {
            t.columns
                .iter()
                .filter_map(|c| c.references_table())
                .filter_map(|name| index.get(name).copied())
                .filter(|&p| p != i)
                .collect()
        })
        .collect();

    let mut levels: Vec<Option<usize>> = vec![None; tables.len()];
    let mut changed = true;
    while changed {
        changed = false;
        for (i, deps) in parents.iter().enumerate() {
            if levels[i].is_some() {
                continue;
            }
            let parent_levels: Vec<usize> = deps.iter().filter_map(|&p| levels[p]).collect();
            if parent_levels.len() == deps.len() {
                levels[i] = Some(parent_levels.iter().max().map_or(0, |l| l + 1));
                changed = true;
            }
        }
    }

    let last = levels.iter().flatten().max().map_or(0, |l| l + 1);
    let mut order: Vec<usize> = (0..tables.len()).collect();
    order.sort_by_key(|&i| (levels[i].unwrap_or(last), i));
    order
}
