//! Replays resolved renames onto the working copy of the old snapshot, so that
//! later passes compare entities under their new identities.

use crate::ddl::Ddl;

pub fn rename_schema(ddl: &mut Ddl, from: &str, to: &str) {
    let retarget = |schema: &mut String| {
        if schema.as_str() == from {
            *schema = to.to_string();
        }
    };

    for s in &mut ddl.schemas {
        if s.name == from {
            s.name = to.to_string();
        }
    }
    ddl.enums.iter_mut().for_each(|e| retarget(&mut e.schema));
    ddl.sequences.iter_mut().for_each(|s| retarget(&mut s.schema));
    ddl.tables.iter_mut().for_each(|t| retarget(&mut t.schema));
    ddl.views.iter_mut().for_each(|v| retarget(&mut v.schema));
    ddl.primary_keys.iter_mut().for_each(|p| retarget(&mut p.schema));
    ddl.uniques.iter_mut().for_each(|u| retarget(&mut u.schema));
    ddl.checks.iter_mut().for_each(|c| retarget(&mut c.schema));
    ddl.indexes.iter_mut().for_each(|i| retarget(&mut i.schema));
    ddl.policies.iter_mut().for_each(|p| retarget(&mut p.schema));
    for fk in &mut ddl.foreign_keys {
        retarget(&mut fk.schema);
        retarget(&mut fk.schema_to);
    }
    for column in &mut ddl.columns {
        retarget(&mut column.schema);
        if let Some(type_schema) = column.column_type.type_schema.as_mut() {
            retarget(type_schema);
        }
    }
}

pub fn rename_role(ddl: &mut Ddl, from: &str, to: &str) {
    for role in &mut ddl.roles {
        if role.name == from {
            role.name = to.to_string();
        }
    }
    for policy in &mut ddl.policies {
        for grantee in &mut policy.to {
            if grantee.as_str() == from {
                *grantee = to.to_string();
            }
        }
    }
}

/// Moves and/or renames an enum; columns of that type follow.
pub fn rename_enum(ddl: &mut Ddl, from: (&str, &str), to: (&str, &str)) {
    for e in &mut ddl.enums {
        if e.schema == from.0 && e.name == from.1 {
            e.schema = to.0.to_string();
            e.name = to.1.to_string();
        }
    }
    for column in &mut ddl.columns {
        if column.column_type.refers_to(from.0, from.1) {
            column.column_type.type_schema = Some(to.0.to_string());
            column.column_type.name = to.1.to_string();
        }
    }
}

pub fn rename_sequence(ddl: &mut Ddl, from: (&str, &str), to: (&str, &str)) {
    for s in &mut ddl.sequences {
        if s.schema == from.0 && s.name == from.1 {
            s.schema = to.0.to_string();
            s.name = to.1.to_string();
        }
    }
}

pub fn rename_view(ddl: &mut Ddl, from: (&str, &str), to: (&str, &str)) {
    for v in &mut ddl.views {
        if v.schema == from.0 && v.name == from.1 {
            v.schema = to.0.to_string();
            v.name = to.1.to_string();
        }
    }
}

/// Moves and/or renames a table together with everything it owns and every
/// foreign key that points at it.
pub fn rename_table(ddl: &mut Ddl, from: (&str, &str), to: (&str, &str)) {
    let owned = |schema: &mut String, table: &mut String| {
        if schema.as_str() == from.0 && table.as_str() == from.1 {
            *schema = to.0.to_string();
            *table = to.1.to_string();
        }
    };

    for t in &mut ddl.tables {
        owned(&mut t.schema, &mut t.name);
    }
    ddl.columns.iter_mut().for_each(|c| owned(&mut c.schema, &mut c.table));
    ddl.primary_keys.iter_mut().for_each(|p| owned(&mut p.schema, &mut p.table));
    ddl.uniques.iter_mut().for_each(|u| owned(&mut u.schema, &mut u.table));
    ddl.checks.iter_mut().for_each(|c| owned(&mut c.schema, &mut c.table));
    ddl.indexes.iter_mut().for_each(|i| owned(&mut i.schema, &mut i.table));
    ddl.policies.iter_mut().for_each(|p| owned(&mut p.schema, &mut p.table));
    for fk in &mut ddl.foreign_keys {
        owned(&mut fk.schema, &mut fk.table);
        owned(&mut fk.schema_to, &mut fk.table_to);
    }
}

/// Renames a column inside every key, reference, index column, index
/// expression and check body of its table.
pub fn rename_column(ddl: &mut Ddl, schema: &str, table: &str, from: &str, to: &str) {
    let replace = |columns: &mut Vec<String>| {
        for c in columns.iter_mut() {
            if c.as_str() == from {
                *c = to.to_string();
            }
        }
    };

    for column in &mut ddl.columns {
        if column.belongs_to(schema, table) && column.name == from {
            column.name = to.to_string();
        }
    }
    for pk in ddl.primary_keys.iter_mut().filter(|p| p.belongs_to(schema, table)) {
        replace(&mut pk.columns);
    }
    for unique in ddl.uniques.iter_mut().filter(|u| u.belongs_to(schema, table)) {
        replace(&mut unique.columns);
    }
    for fk in &mut ddl.foreign_keys {
        if fk.belongs_to(schema, table) {
            replace(&mut fk.columns);
        }
        if fk.references(schema, table) {
            replace(&mut fk.columns_to);
        }
    }
    for index in ddl.indexes.iter_mut().filter(|i| i.belongs_to(schema, table)) {
        for column in index.columns.iter_mut() {
            if column.is_expression {
                column.value = rename_identifier(&column.value, from, to);
            } else if column.value == from {
                column.value = to.to_string();
            }
        }
    }
    for check in ddl.checks.iter_mut().filter(|c| c.belongs_to(schema, table)) {
        check.value = rename_identifier(&check.value, from, to);
    }
}

/// Rewrites references to identifier `from` in a SQL expression. String
/// literals and function names are not touched; unquoted names match
/// case-insensitively, quoted names exactly.
pub fn rename_identifier(sql: &str, from: &str, to: &str) -> String {
    let chars: Vec<char> = sql.chars().collect();
    let mut out = String::with_capacity(sql.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '\'' {
            let start = i;
            i += 1;
            while i < chars.len() {
                if chars[i] == '\'' {
                    if chars.get(i + 1) == Some(&'\'') {
                        i += 2;
                        continue;
                    }
                    break;
                }
                i += 1;
            }
            i = (i + 1).min(chars.len());
            out.extend(&chars[start..i]);
        } else if c == '"' {
            let start = i;
            let mut name = String::new();
            i += 1;
            while i < chars.len() {
                if chars[i] == '"' {
                    if chars.get(i + 1) == Some(&'"') {
                        name.push('"');
                        i += 2;
                        continue;
                    }
                    break;
                }
                name.push(chars[i]);
                i += 1;
            }
            i = (i + 1).min(chars.len());
            if name == from {
                out.push_str(&identifier_sql(to));
            } else {
                out.extend(&chars[start..i]);
            }
        } else if c.is_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_' || chars[i] == '$') {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            let is_call = chars[i..].iter().find(|c| !c.is_whitespace()) == Some(&'(');
            let after_cast = out.ends_with("::");
            if !is_call && !after_cast && word.to_lowercase() == from {
                out.push_str(&identifier_sql(to));
            } else {
                out.push_str(&word);
            }
        } else if c.is_ascii_digit() {
            // Keeps `1e5` and `2x` style tokens whole.
            let start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '.' || chars[i] == '_') {
                i += 1;
            }
            out.extend(&chars[start..i]);
        } else {
            out.push(c);
            i += 1;
        }
    }
    out
}

/// A name as it would be written in an expression.
fn identifier_sql(name: &str) -> String {
    let plain = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || c == '_')
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if plain {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}
