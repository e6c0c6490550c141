//! Record repository — per-user prescription records and the
//! medicine-frequency aggregation.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::DatabaseError;
use crate::models::{MedicineCount, PrescriptionRecord};

/// Validated input for a record save.
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub doctor_name: String,
    pub disease: String,
    pub medicines: Vec<String>,
    pub tests: Vec<String>,
}

/// Insert a record with its ordered medicine and test lists.
pub fn insert_record(
    conn: &Connection,
    user_id: &str,
    new: &NewRecord,
) -> Result<PrescriptionRecord, DatabaseError> {
    let id = Uuid::new_v4();
    let created_at = Utc::now();

    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "INSERT INTO records (id, user_id, doctor_name, disease, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![id.to_string(), user_id, new.doctor_name, new.disease, created_at],
    )?;
    insert_items(&tx, "record_medicines", &id, &new.medicines)?;
    insert_items(&tx, "record_tests", &id, &new.tests)?;
    tx.commit()?;

    Ok(PrescriptionRecord {
        id,
        doctor_name: new.doctor_name.clone(),
        disease: new.disease.clone(),
        medicines: new.medicines.clone(),
        tests: new.tests.clone(),
        created_at,
    })
}

/// List a user's records, newest first.
pub fn list_records(
    conn: &Connection,
    user_id: &str,
) -> Result<Vec<PrescriptionRecord>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, doctor_name, disease, created_at
         FROM records
         WHERE user_id = ?1
         ORDER BY created_at DESC, id",
    )?;

    let rows = stmt.query_map([user_id], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, DateTime<Utc>>(3)?,
        ))
    })?;

    let mut records = Vec::new();
    for row in rows {
        let (id_str, doctor_name, disease, created_at) = row?;
        let id = Uuid::parse_str(&id_str).map_err(|_| DatabaseError::NotFound {
            entity_type: "Record".into(),
            id: id_str.clone(),
        })?;
        records.push(PrescriptionRecord {
            id,
            doctor_name,
            disease,
            medicines: load_items(conn, "record_medicines", &id)?,
            tests: load_items(conn, "record_tests", &id)?,
            created_at,
        });
    }
    Ok(records)
}

/// Delete one of the user's records. `NotFound` when the id is unknown or
/// belongs to another user; child rows go with it via cascade.
pub fn delete_record(
    conn: &Connection,
    user_id: &str,
    id: &Uuid,
) -> Result<(), DatabaseError> {
    let deleted = conn.execute(
        "DELETE FROM records WHERE id = ?1 AND user_id = ?2",
        params![id.to_string(), user_id],
    )?;
    if deleted == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Record".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

/// How often each medicine appears across all of the user's records,
/// most frequent first (ties broken alphabetically).
pub fn medicine_frequency(
    conn: &Connection,
    user_id: &str,
) -> Result<Vec<MedicineCount>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT m.name, COUNT(*) AS n
         FROM record_medicines m
         JOIN records r ON r.id = m.record_id
         WHERE r.user_id = ?1
         GROUP BY m.name
         ORDER BY n DESC, m.name ASC",
    )?;

    let rows = stmt.query_map([user_id], |row| {
        Ok(MedicineCount {
            name: row.get(0)?,
            count: row.get(1)?,
        })
    })?;

    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

// ── Internal ────────────────────────────────────────────────

fn insert_items(
    conn: &Connection,
    table: &str,
    record_id: &Uuid,
    items: &[String],
) -> Result<(), DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "INSERT INTO {table} (record_id, position, name) VALUES (?1, ?2, ?3)"
    ))?;
    for (position, name) in items.iter().enumerate() {
        stmt.execute(params![record_id.to_string(), position as i64, name])?;
    }
    Ok(())
}

fn load_items(
    conn: &Connection,
    table: &str,
    record_id: &Uuid,
) -> Result<Vec<String>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT name FROM {table} WHERE record_id = ?1 ORDER BY position"
    ))?;
    let rows = stmt.query_map([record_id.to_string()], |row| row.get(0))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    fn sample_record(doctor: &str, medicines: &[&str], tests: &[&str]) -> NewRecord {
        NewRecord {
            doctor_name: doctor.to_string(),
            disease: "Hypertension".to_string(),
            medicines: medicines.iter().map(|s| s.to_string()).collect(),
            tests: tests.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn insert_then_list_round_trips() {
        let conn = open_memory_database().unwrap();
        let new = sample_record("Dr. X", &["Napa 500 mg", "Seclo 20 mg"], &["CBC"]);
        let saved = insert_record(&conn, "user-1", &new).unwrap();

        let records = list_records(&conn, "user-1").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, saved.id);
        assert_eq!(records[0].doctor_name, "Dr. X");
        assert_eq!(records[0].medicines, vec!["Napa 500 mg", "Seclo 20 mg"]);
        assert_eq!(records[0].tests, vec!["CBC"]);
    }

    #[test]
    fn medicine_order_is_preserved() {
        let conn = open_memory_database().unwrap();
        let meds = ["Zimax 500 mg", "Ace 500 mg", "Brufen 400 mg"];
        insert_record(&conn, "u", &sample_record("Dr. X", &meds, &[])).unwrap();

        let records = list_records(&conn, "u").unwrap();
        assert_eq!(records[0].medicines, meds);
    }

    #[test]
    fn list_is_newest_first() {
        let conn = open_memory_database().unwrap();
        let first = insert_record(&conn, "u", &sample_record("Dr. A", &[], &[])).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let second = insert_record(&conn, "u", &sample_record("Dr. B", &[], &[])).unwrap();

        let records = list_records(&conn, "u").unwrap();
        assert_eq!(records[0].id, second.id);
        assert_eq!(records[1].id, first.id);
    }

    #[test]
    fn users_are_isolated() {
        let conn = open_memory_database().unwrap();
        insert_record(&conn, "alice", &sample_record("Dr. A", &["Napa"], &[])).unwrap();
        insert_record(&conn, "bob", &sample_record("Dr. B", &["Seclo"], &[])).unwrap();

        let alice = list_records(&conn, "alice").unwrap();
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].doctor_name, "Dr. A");
        assert!(list_records(&conn, "carol").unwrap().is_empty());
    }

    #[test]
    fn delete_removes_record_and_children() {
        let conn = open_memory_database().unwrap();
        let saved =
            insert_record(&conn, "u", &sample_record("Dr. X", &["Napa"], &["CBC"])).unwrap();

        delete_record(&conn, "u", &saved.id).unwrap();

        assert!(list_records(&conn, "u").unwrap().is_empty());
        let orphans: i64 = conn
            .query_row("SELECT COUNT(*) FROM record_medicines", [], |row| row.get(0))
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[test]
    fn delete_unknown_id_is_not_found() {
        let conn = open_memory_database().unwrap();
        let err = delete_record(&conn, "u", &Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[test]
    fn delete_is_scoped_to_owner() {
        let conn = open_memory_database().unwrap();
        let saved = insert_record(&conn, "alice", &sample_record("Dr. A", &[], &[])).unwrap();

        let err = delete_record(&conn, "bob", &saved.id).unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
        assert_eq!(list_records(&conn, "alice").unwrap().len(), 1);
    }

    #[test]
    fn frequency_counts_across_records() {
        let conn = open_memory_database().unwrap();
        insert_record(&conn, "u", &sample_record("Dr. A", &["Napa", "Seclo"], &[])).unwrap();
        insert_record(&conn, "u", &sample_record("Dr. B", &["Napa"], &[])).unwrap();
        insert_record(&conn, "other", &sample_record("Dr. C", &["Napa"], &[])).unwrap();

        let counts = medicine_frequency(&conn, "u").unwrap();
        assert_eq!(
            counts,
            vec![
                MedicineCount { name: "Napa".into(), count: 2 },
                MedicineCount { name: "Seclo".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn frequency_ties_sort_alphabetically() {
        let conn = open_memory_database().unwrap();
        insert_record(&conn, "u", &sample_record("Dr. A", &["Zimax", "Ace"], &[])).unwrap();

        let counts = medicine_frequency(&conn, "u").unwrap();
        assert_eq!(counts[0].name, "Ace");
        assert_eq!(counts[1].name, "Zimax");
    }

    #[test]
    fn frequency_empty_for_new_user() {
        let conn = open_memory_database().unwrap();
        assert!(medicine_frequency(&conn, "nobody").unwrap().is_empty());
    }
}
