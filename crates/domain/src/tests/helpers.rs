// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Duty, DutyChart, DutyDetails, Employee, Office, Schedule, ShiftTime};
use time::Date;

pub fn t(value: &str) -> ShiftTime {
    value.parse().expect("valid shift time")
}

pub fn create_test_schedule(id: i64, name: &str, start: &str, end: &str, office: Option<i64>) -> Schedule {
    Schedule::new(id, Some(String::from(name)), t(start), t(end), office)
}

pub fn create_test_chart(effective_date: Date, end_date: Option<Date>) -> DutyChart {
    DutyChart {
        id: 5,
        name: Some(String::from("Network Operations")),
        office_id: 3,
        effective_date,
        end_date,
        schedule_ids: vec![11, 12],
    }
}

pub fn create_test_duty(id: i64, user_id: i64, date: Date, schedule_id: i64) -> Duty {
    Duty {
        id,
        date,
        user_id,
        office_id: 3,
        schedule_id,
        duty_chart_id: Some(5),
        is_completed: false,
        currently_available: true,
        details: DutyDetails::default(),
    }
}

pub fn create_test_employee(id: i64, office_id: i64) -> Employee {
    Employee {
        id,
        full_name: String::from("Sita Sharma"),
        office_id: Some(office_id),
        ..Employee::default()
    }
}

pub fn create_test_office(id: i64, directorate: Option<&str>, department: Option<&str>) -> Office {
    Office {
        id,
        name: format!("Office {id}"),
        department_id: None,
        department_name: department.map(String::from),
        directorate_name: directorate.map(String::from),
    }
}
