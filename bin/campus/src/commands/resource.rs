//! Generic resource CRUD commands.
//!
//! `campus get students`, `campus create student --json ...`, etc.
//! Resource names map onto the entity services.

use std::path::Path;

use anyhow::Result;
use serde_json::Value;

use campus_client::{Client, StudentForm, StudentUpdate};

use super::build_client;

const DEFAULT_PAGE: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Students,
    Customers,
    Suppliers,
    Courses,
    AcademicYears,
    Enrollments,
}

/// Map a singular/plural resource name to its kind.
fn resource_kind(resource: &str) -> Result<Kind> {
    match resource.to_lowercase().as_str() {
        "student" | "students" => Ok(Kind::Students),
        "partner" | "partners" | "customer" | "customers" => Ok(Kind::Customers),
        "supplier" | "suppliers" => Ok(Kind::Suppliers),
        "course" | "courses" => Ok(Kind::Courses),
        "academic-year" | "academic-years" | "year" | "years" => Ok(Kind::AcademicYears),
        "enrollment" | "enrollments" => Ok(Kind::Enrollments),
        _ => Err(anyhow::anyhow!("Unknown resource type: {}", resource)),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_body(json_body: &str) -> Result<Value> {
    serde_json::from_str(json_body).map_err(|e| anyhow::anyhow!("Invalid JSON: {}", e))
}

/// Table columns per resource kind.
fn columns(kind: Kind) -> &'static [&'static str] {
    match kind {
        Kind::Students | Kind::Customers | Kind::Suppliers => &["id", "name", "email", "phone"],
        Kind::Courses => &["id", "name", "code", "credits", "semester"],
        Kind::AcademicYears => &["id", "name", "start_date", "end_date", "is_current"],
        Kind::Enrollments => &["id", "student_id", "course_id", "status"],
    }
}

/// Render a table cell. Unset columns show as `-`; `[id, name]` reference
/// pairs show the name.
fn cell(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        Value::Array(pair) => pair
            .get(1)
            .and_then(Value::as_str)
            .unwrap_or("-")
            .to_string(),
        other => other.to_string(),
    }
}

fn print_set<T: serde::Serialize>(
    set: &campus_core::RecordSet<T>,
    kind: Kind,
    output_json: bool,
) -> Result<()> {
    if output_json {
        return print_json(set);
    }

    let columns = columns(kind);
    let rows: Vec<Vec<String>> = set
        .records
        .iter()
        .map(|record| {
            let value = serde_json::to_value(record)?;
            Ok(columns.iter().map(|col| cell(&value[*col])).collect())
        })
        .collect::<Result<_>>()?;

    let mut widths: Vec<usize> = columns.iter().map(|col| col.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(col, &width)| format!("{:<width$}", col.to_uppercase()))
        .collect();
    println!("{}", header.join("  "));
    for row in &rows {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{:<width$}", cell))
            .collect();
        println!("{}", line.join("  "));
    }
    println!("({} of {} records)", set.records.len(), set.total);
    Ok(())
}

async fn print_list(
    client: &Client,
    kind: Kind,
    output_json: bool,
    limit: u32,
    offset: u32,
) -> Result<()> {
    match kind {
        Kind::Students => {
            print_set(&client.students.get_all(limit, offset).await?, kind, output_json)
        }
        Kind::Customers => print_set(
            &client.partners.get_customers(limit, offset).await?,
            kind,
            output_json,
        ),
        Kind::Suppliers => print_set(
            &client.partners.get_suppliers(limit, offset).await?,
            kind,
            output_json,
        ),
        Kind::Courses => {
            print_set(&client.courses.get_all(limit, offset).await?, kind, output_json)
        }
        Kind::AcademicYears => print_set(
            &client.academic_years.get_all(limit, offset).await?,
            kind,
            output_json,
        ),
        Kind::Enrollments => print_set(
            &client.enrollments.get_all(limit, offset).await?,
            kind,
            output_json,
        ),
    }
}

async fn print_one(client: &Client, kind: Kind, id: i64) -> Result<()> {
    match kind {
        Kind::Students => match client.students.get_by_id(id).await? {
            Some(student) => print_json(&student),
            None => anyhow::bail!("student {} not found", id),
        },
        Kind::Customers | Kind::Suppliers => match client.partners.get_by_id(id).await? {
            Some(partner) => print_json(&partner),
            None => anyhow::bail!("partner {} not found", id),
        },
        Kind::Courses => match client.courses.get_by_id(id).await? {
            Some(course) => print_json(&course),
            None => anyhow::bail!("course {} not found", id),
        },
        Kind::AcademicYears => match client.academic_years.get_by_id(id).await? {
            Some(year) => print_json(&year),
            None => anyhow::bail!("academic year {} not found", id),
        },
        Kind::Enrollments => anyhow::bail!("use `campus get enrollments` and filter"),
    }
}

/// GET a resource (list or single by id).
pub async fn get(
    resource: &str,
    id: Option<i64>,
    output_json: bool,
    limit: Option<u32>,
    offset: Option<u32>,
    config_path: &Path,
) -> Result<()> {
    let kind = resource_kind(resource)?;
    let client = build_client(config_path)?;

    match id {
        Some(id) => print_one(&client, kind, id).await,
        None => {
            print_list(
                &client,
                kind,
                output_json,
                limit.unwrap_or(DEFAULT_PAGE),
                offset.unwrap_or(0),
            )
            .await
        }
    }
}

/// CREATE a resource from a JSON body.
pub async fn create(resource: &str, json_body: &str, config_path: &Path) -> Result<()> {
    let kind = resource_kind(resource)?;
    let client = build_client(config_path)?;
    let body = parse_body(json_body)?;

    let created = match kind {
        Kind::Students => {
            let form: StudentForm = serde_json::from_value(body)
                .map_err(|e| anyhow::anyhow!("Invalid student: {}", e))?;
            client.students.create(&form).await?
        }
        Kind::Customers | Kind::Suppliers => client.partners.create(body).await?,
        Kind::Courses => client.courses.create(body).await?,
        Kind::AcademicYears => client.academic_years.create(body).await?,
        Kind::Enrollments => {
            let student_id = body["student_id"]
                .as_i64()
                .ok_or_else(|| anyhow::anyhow!("enrollment needs a numeric student_id"))?;
            let course_id = body["course_id"]
                .as_i64()
                .ok_or_else(|| anyhow::anyhow!("enrollment needs a numeric course_id"))?;
            let academic_year_id = body["academic_year_id"]
                .as_i64()
                .ok_or_else(|| anyhow::anyhow!("enrollment needs a numeric academic_year_id"))?;
            client
                .enrollments
                .enroll(student_id, course_id, academic_year_id)
                .await?
        }
    };

    println!("Created with id {}.", created.id);
    Ok(())
}

/// UPDATE a resource from a JSON body.
pub async fn update(resource: &str, id: i64, json_body: &str, config_path: &Path) -> Result<()> {
    let kind = resource_kind(resource)?;
    let client = build_client(config_path)?;
    let body = parse_body(json_body)?;

    let updated = match kind {
        Kind::Students => {
            let patch: StudentUpdate = serde_json::from_value(body)
                .map_err(|e| anyhow::anyhow!("Invalid student patch: {}", e))?;
            client.students.update(id, &patch).await?
        }
        Kind::Customers | Kind::Suppliers => client.partners.update(id, body).await?,
        Kind::Courses => client.courses.update(id, body).await?,
        Kind::AcademicYears => client.academic_years.update(id, body).await?,
        Kind::Enrollments => {
            let status = body["status"]
                .as_str()
                .ok_or_else(|| anyhow::anyhow!("enrollment update needs a status"))?;
            client.enrollments.update_status(id, status).await?
        }
    };

    if updated {
        println!("{} {} updated.", resource.trim_end_matches('s'), id);
    } else {
        anyhow::bail!("{} {} was not updated", resource.trim_end_matches('s'), id);
    }
    Ok(())
}

/// DELETE a resource by id.
pub async fn delete(resource: &str, id: i64, config_path: &Path) -> Result<()> {
    let kind = resource_kind(resource)?;
    let client = build_client(config_path)?;

    let deleted = match kind {
        Kind::Students => client.students.delete(id).await?,
        Kind::Customers | Kind::Suppliers => client.partners.delete(id).await?,
        Kind::Courses => client.courses.delete(id).await?,
        Kind::AcademicYears => client.academic_years.delete(id).await?,
        Kind::Enrollments => anyhow::bail!("enrollments cannot be deleted, only re-statused"),
    };

    if deleted {
        println!("{} {} deleted.", resource.trim_end_matches('s'), id);
    } else {
        anyhow::bail!("{} {} was not deleted", resource.trim_end_matches('s'), id);
    }
    Ok(())
}

/// SEARCH students by free text.
pub async fn search(
    resource: &str,
    term: &str,
    output_json: bool,
    config_path: &Path,
) -> Result<()> {
    if resource_kind(resource)? != Kind::Students {
        anyhow::bail!("search is only available for students");
    }
    let client = build_client(config_path)?;
    print_set(
        &client.students.search(term).await?,
        Kind::Students,
        output_json,
    )
}
