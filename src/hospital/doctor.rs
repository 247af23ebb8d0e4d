//! The hospital's doctors.
//!
//! Doctors are not managed through the app. A fixed set is inserted the
//! first time the database is created.

use rusqlite::{Connection, Row};

use crate::{DatabaseId, Error};

/// A doctor that patients can book appointments with.
#[derive(Debug, Clone, PartialEq)]
pub struct Doctor {
    pub id: DatabaseId,
    pub name: String,
    pub specialization: String,
    pub department: String,
}

const SAMPLE_DOCTORS: [(&str, &str, &str); 5] = [
    ("Dr. Sarah Johnson", "Cardiology", "Heart Center"),
    ("Dr. Michael Chen", "Neurology", "Brain & Spine Center"),
    ("Dr. Emily Rodríguez", "Pediatrics", "Children’s Wing"),
    ("Dr. Robert Kim", "Orthopedics", "Bone & Joint Center"),
    ("Dr. Amanda Foster", "Dermatology", "Skin Care Center"),
];

pub fn create_doctor_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS doctor (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                specialization TEXT NOT NULL,
                department TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Insert the sample doctors if the doctor table is empty.
pub fn seed_doctors(connection: &Connection) -> Result<(), Error> {
    let count: i64 = connection.query_row("SELECT COUNT(id) FROM doctor", [], |row| row.get(0))?;

    if count > 0 {
        return Ok(());
    }

    let mut statement = connection
        .prepare("INSERT INTO doctor (name, specialization, department) VALUES (?1, ?2, ?3)")?;

    for doctor in SAMPLE_DOCTORS {
        statement.execute(doctor)?;
    }

    tracing::info!("Added {} sample doctors", SAMPLE_DOCTORS.len());

    Ok(())
}

fn map_row_to_doctor(row: &Row) -> Result<Doctor, rusqlite::Error> {
    Ok(Doctor {
        id: row.get(0)?,
        name: row.get(1)?,
        specialization: row.get(2)?,
        department: row.get(3)?,
    })
}

pub fn get_doctors(connection: &Connection) -> Result<Vec<Doctor>, Error> {
    connection
        .prepare("SELECT id, name, specialization, department FROM doctor ORDER BY id")?
        .query_map([], map_row_to_doctor)?
        .map(|doctor_result| doctor_result.map_err(Error::from))
        .collect()
}
