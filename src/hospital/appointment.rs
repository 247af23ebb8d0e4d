//! Appointments booked with a doctor.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{DatabaseId, Error};

/// The status given to every new appointment.
pub const DEFAULT_STATUS: &str = "Scheduled";

/// An appointment together with the name of the doctor it is booked with.
#[derive(Debug, Clone, PartialEq)]
pub struct Appointment {
    pub id: DatabaseId,
    pub doctor_id: DatabaseId,
    pub doctor_name: String,
    pub patient_name: String,
    pub date: Date,
    /// The time of day as entered, e.g. "14:30".
    pub time: String,
    pub purpose: String,
    pub status: String,
}

/// The form data for booking an appointment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentForm {
    pub doctor_id: DatabaseId,
    pub patient_name: String,
    pub date: Date,
    pub time: String,
    pub purpose: String,
}

pub fn create_appointment_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS appointment (
                id INTEGER PRIMARY KEY,
                doctor_id INTEGER NOT NULL REFERENCES doctor(id),
                patient_name TEXT NOT NULL,
                date TEXT NOT NULL,
                time TEXT NOT NULL,
                purpose TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'Scheduled'
                )",
        (),
    )?;

    Ok(())
}

/// Book an appointment with the status [DEFAULT_STATUS].
///
/// # Errors
///
/// Returns [Error::InvalidForeignKey] if the doctor does not exist.
pub fn create_appointment(
    form: &AppointmentForm,
    connection: &Connection,
) -> Result<DatabaseId, Error> {
    connection.execute(
        "INSERT INTO appointment (doctor_id, patient_name, date, time, purpose)
        VALUES (?1, ?2, ?3, ?4, ?5)",
        (
            form.doctor_id,
            &form.patient_name,
            form.date,
            &form.time,
            &form.purpose,
        ),
    )?;

    Ok(connection.last_insert_rowid())
}

fn map_row_to_appointment(row: &Row) -> Result<Appointment, rusqlite::Error> {
    Ok(Appointment {
        id: row.get(0)?,
        doctor_id: row.get(1)?,
        doctor_name: row.get(2)?,
        patient_name: row.get(3)?,
        date: row.get(4)?,
        time: row.get(5)?,
        purpose: row.get(6)?,
        status: row.get(7)?,
    })
}

/// Get every appointment, soonest first.
pub fn get_appointments(connection: &Connection) -> Result<Vec<Appointment>, Error> {
    connection
        .prepare(
            "SELECT appointment.id, doctor_id, doctor.name, patient_name, date, time, purpose, status
            FROM appointment
            INNER JOIN doctor ON doctor.id = appointment.doctor_id
            ORDER BY date, time, appointment.id",
        )?
        .query_map([], map_row_to_appointment)?
        .map(|appointment_result| appointment_result.map_err(Error::from))
        .collect()
}
