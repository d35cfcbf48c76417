//! SQLite access for the community schema.
//!
//! Only the tables the audience queries read are bootstrapped here. The CRUD
//! surface for users, startups and admins lives elsewhere.

use rusqlite::{Connection, OpenFlags};
use std::path::Path;

use crate::error::Result;

/// Open (creating if absent) the database at `path`.
pub fn open(path: &Path) -> Result<Connection> {
    Ok(Connection::open(path)?)
}

/// Open an existing database for reading. Fails if the file does not exist.
pub fn open_read_only(path: &Path) -> Result<Connection> {
    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    Ok(Connection::open_with_flags(path, flags)?)
}

/// Create the `users`, `startups` and `startup_members` tables if missing.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS users (
            user_id INTEGER PRIMARY KEY,
            username TEXT,
            first_name TEXT,
            last_name TEXT DEFAULT '',
            phone TEXT DEFAULT '',
            gender TEXT DEFAULT '',
            birth_date TEXT DEFAULT '',
            bio TEXT DEFAULT '',
            joined_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            status TEXT DEFAULT 'active'
        );
        CREATE TABLE IF NOT EXISTS startups (
            startup_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT,
            logo TEXT,
            group_link TEXT NOT NULL,
            owner_id INTEGER NOT NULL,
            status TEXT DEFAULT 'pending',
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            started_at TIMESTAMP,
            ended_at TIMESTAMP,
            results TEXT,
            views INTEGER DEFAULT 0,
            FOREIGN KEY (owner_id) REFERENCES users (user_id)
        );
        CREATE TABLE IF NOT EXISTS startup_members (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            startup_id INTEGER NOT NULL,
            user_id INTEGER NOT NULL,
            status TEXT DEFAULT 'pending',
            joined_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (startup_id) REFERENCES startups (startup_id),
            FOREIGN KEY (user_id) REFERENCES users (user_id),
            UNIQUE(startup_id, user_id)
        );",
    )?;
    Ok(())
}

/// Open the database at `path` and make sure the schema exists.
pub fn bootstrap(path: &Path) -> Result<()> {
    let conn = open(path)?;
    ensure_schema(&conn)
}
