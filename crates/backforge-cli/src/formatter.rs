//! Output formatters for compiled models.

use backforge_core::contract::{ContractField, ElementType, FieldType};
use backforge_core::storage::{ColumnType, TableDef};
use backforge_core::{CompiledModel, ForeignKeyDecision};
use clap::ValueEnum;
use comfy_table::{Cell, Table};

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table summary
    Table,
    /// JSON format
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Trait for formatting output.
pub trait Formatter: Send + Sync {
    /// Format a compiled model.
    fn format_compiled(&self, compiled: &CompiledModel) -> Result<String, backforge_core::Error>;
}

/// Create a formatter for the given output format.
pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Table => Box::new(TableFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Table formatter using comfy-table.
pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format_compiled(&self, compiled: &CompiledModel) -> Result<String, backforge_core::Error> {
        let mut sections = vec![
            format!("Model: {}", compiled.name),
            section("Foreign keys", decisions_table(compiled)),
            section("Tables", tables_table(compiled)),
        ];

        if !compiled.storage.join_tables.is_empty() {
            sections.push(section("Join tables", join_tables_table(compiled)));
        }

        sections.push(section("Contracts", contracts_table(compiled)));

        if !compiled.contracts.enumerations.is_empty() {
            sections.push(section("Enumerations", enumerations_table(compiled)));
        }

        sections.push(section("Construction", construction_table(compiled)));

        if !compiled.unsupported_associations.is_empty() {
            sections.push(format!(
                "Skipped associations (not binary): {}",
                compiled.unsupported_associations.join(", ")
            ));
        }

        Ok(sections.join("\n\n"))
    }
}

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_compiled(&self, compiled: &CompiledModel) -> Result<String, backforge_core::Error> {
        compiled.to_json()
    }
}

fn section(title: &str, table: Table) -> String {
    format!("{}\n{}", title, table)
}

fn decisions_table(compiled: &CompiledModel) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Association", "Kind", "Owner", "Column", "Target", "Required"]);

    for decision in compiled.decisions.iter() {
        let row = match decision {
            ForeignKeyDecision::Reference(fk) => vec![
                Cell::new(&fk.association),
                Cell::new(fk.cardinality),
                Cell::new(&fk.owner_class),
                Cell::new(fk.column_name()),
                Cell::new(&fk.target_class),
                Cell::new(fk.required),
            ],
            ForeignKeyDecision::JoinTable { association } => vec![
                Cell::new(association),
                Cell::new("join table"),
                Cell::new("-"),
                Cell::new("-"),
                Cell::new("-"),
                Cell::new("-"),
            ],
        };
        table.add_row(row);
    }

    table
}

fn tables_table(compiled: &CompiledModel) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Table", "Parent", "Columns", "References"]);

    for def in &compiled.storage.tables {
        table.add_row(vec![
            Cell::new(&def.name),
            Cell::new(def.parent.as_ref().map_or("-", |p| p.table.as_str())),
            Cell::new(columns(def)),
            Cell::new(references(def)),
        ]);
    }

    table
}

fn columns(def: &TableDef) -> String {
    let mut columns = vec![format!("{} (pk)", def.identity.column)];
    if let Some(discriminator) = &def.discriminator {
        columns.push(format!("{} (discriminator)", discriminator));
    }
    columns.extend(def.columns.iter().map(|column| {
        let ty = match &column.ty {
            ColumnType::Primitive(primitive) => primitive.name().to_string(),
            ColumnType::Enumeration(name) => name.clone(),
        };
        format!("{}: {}{}", column.name, ty, nullable_marker(column.nullable))
    }));
    columns.join("\n")
}

fn references(def: &TableDef) -> String {
    if def.references.is_empty() {
        return "-".to_string();
    }

    def.references
        .iter()
        .map(|reference| {
            format!(
                "{} -> {}{}{}",
                reference.name,
                reference.references,
                nullable_marker(reference.nullable),
                if reference.unique { " unique" } else { "" }
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn nullable_marker(nullable: bool) -> &'static str {
    if nullable {
        "?"
    } else {
        ""
    }
}

fn join_tables_table(compiled: &CompiledModel) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Join table", "Association", "Columns"]);

    for join in &compiled.storage.join_tables {
        let columns = join
            .columns
            .iter()
            .map(|column| format!("{} -> {}", column.name, column.references))
            .collect::<Vec<_>>()
            .join("\n");
        table.add_row(vec![
            Cell::new(&join.name),
            Cell::new(&join.association),
            Cell::new(columns),
        ]);
    }

    table
}

fn contracts_table(compiled: &CompiledModel) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Contract", "Parent", "Fields"]);

    for contract in compiled.contracts.contracts.values() {
        let fields = contract
            .fields
            .iter()
            .map(format_field)
            .collect::<Vec<_>>()
            .join("\n");
        let name = if contract.is_abstract {
            format!("{} (abstract)", contract.name)
        } else {
            contract.name.clone()
        };
        table.add_row(vec![
            Cell::new(name),
            Cell::new(contract.parent.as_deref().unwrap_or("-")),
            Cell::new(if fields.is_empty() { "-".to_string() } else { fields }),
        ]);
    }

    table
}

fn format_field(field: &ContractField) -> String {
    let marker = if field.required { "" } else { "?" };
    format!("{}: {}{}", field.name, format_field_type(&field.ty), marker)
}

fn format_field_type(ty: &FieldType) -> String {
    match ty {
        FieldType::Primitive { primitive } => primitive.name().to_string(),
        FieldType::Enumeration { name } => name.clone(),
        FieldType::Reference { class } => format!("id<{}>", class),
        FieldType::List {
            class,
            element: ElementType::ByReference,
        } => format!("list[id<{}>]", class),
        FieldType::List {
            class,
            element: ElementType::ByReferenceOrValue { contract },
        } => format!("list[id<{}> | {}]", class, contract),
    }
}

fn enumerations_table(compiled: &CompiledModel) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Enumeration", "Literals"]);

    for enumeration in &compiled.contracts.enumerations {
        let literals = enumeration
            .literals
            .iter()
            .map(|literal| literal.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![Cell::new(&enumeration.name), Cell::new(literals)]);
    }

    table
}

fn construction_table(compiled: &CompiledModel) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Class", "Parameters", "Links"]);

    for plan in &compiled.construction {
        let parameters = plan
            .args
            .iter()
            .filter(|arg| arg.binding != backforge_core::Binding::Link)
            .map(|arg| {
                if arg.parameter == arg.source_field {
                    arg.parameter.clone()
                } else {
                    format!("{} <- {}", arg.parameter, arg.source_field)
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        let links = plan
            .links()
            .map(|arg| arg.parameter.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            Cell::new(&plan.class),
            Cell::new(if parameters.is_empty() { "-".to_string() } else { parameters }),
            Cell::new(if links.is_empty() { "-".to_string() } else { links }),
        ]);
    }

    table
}
