//! The hospital dashboard and the endpoint for booking appointments.

use axum::{
    Extension, Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, UserID,
    auth::log_out_response,
    endpoints::hospital as endpoints,
    hospital::{
        appointment::{Appointment, AppointmentForm, create_appointment, get_appointments},
        doctor::{Doctor, get_doctors},
        user::{HospitalUser, get_user_by_id, get_users},
    },
    html::{
        FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, form_error, nav_bar, submit_button,
        text_input,
    },
};

fn book_appointment_form(doctors: &[Doctor], error_message: Option<&str>) -> Markup {
    html! {
        form action=(endpoints::BOOK_APPOINTMENT) method="post" class="card"
        {
            h2 { "Book Appointment" }

            (form_error(error_message))

            label for="doctor_id" class=(FORM_LABEL_STYLE) { "Doctor" }
            select name="doctor_id" id="doctor_id" class=(FORM_TEXT_INPUT_STYLE) required
            {
                @for doctor in doctors
                {
                    option value=(doctor.id) { (doctor.name) " (" (doctor.specialization) ")" }
                }
            }

            (text_input("Patient Name", "patient_name", "text", ""))
            (text_input("Date", "date", "date", ""))
            (text_input("Time", "time", "time", ""))
            (text_input("Purpose", "purpose", "text", ""))
            (submit_button("Book"))
        }
    }
}

fn table(headers: &[&str], rows: Markup) -> Markup {
    html! {
        table
        {
            thead class=(TABLE_HEADER_STYLE)
            {
                tr
                {
                    @for header in headers
                    {
                        th class=(TABLE_CELL_STYLE) { (header) }
                    }
                }
            }

            tbody { (rows) }
        }
    }
}

fn dashboard_view(
    user: &HospitalUser,
    doctors: &[Doctor],
    appointments: &[Appointment],
    users: &[HospitalUser],
    error_message: Option<&str>,
) -> Markup {
    let doctor_rows = html! {
        @for doctor in doctors
        {
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE) { (doctor.name) }
                td class=(TABLE_CELL_STYLE) { (doctor.specialization) }
                td class=(TABLE_CELL_STYLE) { (doctor.department) }
            }
        }
    };

    let appointment_rows = html! {
        @for appointment in appointments
        {
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE) { (appointment.patient_name) }
                td class=(TABLE_CELL_STYLE) { (appointment.doctor_name) }
                td class=(TABLE_CELL_STYLE) { (appointment.date) }
                td class=(TABLE_CELL_STYLE) { (appointment.time) }
                td class=(TABLE_CELL_STYLE) { (appointment.purpose) }
                td class=(TABLE_CELL_STYLE) { (appointment.status) }
            }
        }
    };

    let user_rows = html! {
        @for user in users
        {
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE) { (user.full_name) }
                td class=(TABLE_CELL_STYLE) { (user.username) }
                td class=(TABLE_CELL_STYLE) { (user.email) }
                td class=(TABLE_CELL_STYLE) { (user.phone) }
                td class=(TABLE_CELL_STYLE) { (user.role) }
            }
        }
    };

    let content = html! {
        (nav_bar(&[(endpoints::DASHBOARD_VIEW, "Dashboard"), (endpoints::LOG_OUT, "Log out")]))

        main class=(PAGE_CONTAINER_STYLE)
        {
            h1 { "Welcome, " (user.full_name) }

            (book_appointment_form(doctors, error_message))

            section id="doctors" class="card"
            {
                h2 { "Doctors" }
                (table(&["Name", "Specialization", "Department"], doctor_rows))
            }

            section id="appointments" class="card"
            {
                h2 { "Appointments" }
                (table(&["Patient", "Doctor", "Date", "Time", "Purpose", "Status"], appointment_rows))
            }

            section id="users" class="card"
            {
                h2 { "Staff" }
                (table(&["Name", "Username", "Email", "Phone", "Role"], user_rows))
            }
        }
    };

    base("Dashboard", "Hospital", &content)
}

fn render_dashboard(
    user_id: UserID,
    error_message: Option<&str>,
    jar: PrivateCookieJar,
    connection: &Connection,
) -> Response {
    let user = match get_user_by_id(user_id, connection) {
        Ok(user) => user,
        Err(Error::NotFound) => {
            tracing::warn!("Session refers to unknown user {user_id}, logging out.");
            return log_out_response(jar, endpoints::LOG_IN);
        }
        Err(error) => return error.into_response(),
    };

    let lists = get_doctors(connection).and_then(|doctors| {
        Ok((
            doctors,
            get_appointments(connection)?,
            get_users(connection)?,
        ))
    });

    match lists {
        Ok((doctors, appointments, users)) => {
            dashboard_view(&user, &doctors, &appointments, &users, error_message).into_response()
        }
        Err(error) => {
            tracing::error!("Could not load the hospital dashboard: {error}");
            error.into_response()
        }
    }
}

/// Display the doctors, appointments and staff.
pub async fn get_dashboard_page(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
) -> Response {
    match state.db_connection.lock() {
        Ok(connection) => render_dashboard(user_id, None, jar, &connection),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError.into_response()
        }
    }
}

/// A route handler for booking an appointment, redirects to the dashboard.
///
/// The dashboard is shown with an error message if the doctor does not exist.
pub async fn book_appointment_endpoint(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
    Form(form): Form<AppointmentForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match create_appointment(&form, &connection) {
        Ok(appointment_id) => {
            tracing::debug!("User {user_id} booked appointment {appointment_id}");
            Redirect::to(endpoints::DASHBOARD_VIEW).into_response()
        }
        Err(Error::InvalidForeignKey) => render_dashboard(
            user_id,
            Some("Please choose one of the listed doctors."),
            jar,
            &connection,
        ),
        Err(error) => {
            tracing::error!("Could not book appointment {form:?}: {error}");
            error.into_response()
        }
    }
}
