//! Employees and their salaries.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{DatabaseId, Error};

/// An employee on the payroll.
#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    /// The employee's ID in the application database.
    pub id: DatabaseId,
    /// The employee's full name.
    pub name: String,
    /// The employee's job title.
    pub position: String,
    /// The yearly salary in dollars.
    pub salary: f64,
    /// The date the employee started.
    pub joining_date: Date,
}

/// The form data for adding an employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeForm {
    pub name: String,
    pub position: String,
    pub salary: f64,
    pub joining_date: Date,
}

pub fn create_employee_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS employee (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                position TEXT NOT NULL,
                salary REAL NOT NULL,
                joining_date TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

pub fn create_employee(form: &EmployeeForm, connection: &Connection) -> Result<Employee, Error> {
    connection.execute(
        "INSERT INTO employee (name, position, salary, joining_date) VALUES (?1, ?2, ?3, ?4)",
        (&form.name, &form.position, form.salary, form.joining_date),
    )?;

    Ok(Employee {
        id: connection.last_insert_rowid(),
        name: form.name.clone(),
        position: form.position.clone(),
        salary: form.salary,
        joining_date: form.joining_date,
    })
}

fn map_row_to_employee(row: &Row) -> Result<Employee, rusqlite::Error> {
    Ok(Employee {
        id: row.get(0)?,
        name: row.get(1)?,
        position: row.get(2)?,
        salary: row.get(3)?,
        joining_date: row.get(4)?,
    })
}

/// Get every employee in the order they were added.
pub fn get_employees(connection: &Connection) -> Result<Vec<Employee>, Error> {
    connection
        .prepare("SELECT id, name, position, salary, joining_date FROM employee ORDER BY id")?
        .query_map([], map_row_to_employee)?
        .map(|employee_result| employee_result.map_err(Error::from))
        .collect()
}

/// The sum of the salaries of `employees`.
pub fn total_salary(employees: &[Employee]) -> f64 {
    employees.iter().map(|employee| employee.salary).sum()
}
