use rusqlite::Connection;

pub fn create_tables(conn: &Connection) -> rusqlite::Result<()> {
    // Users table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT UNIQUE NOT NULL,
            password TEXT NOT NULL,
            name TEXT,
            email TEXT,
            dateOfBirth TEXT,
            address TEXT
        )",
        [],
    )?;

    // Schedules table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schedules (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            userId INTEGER NOT NULL,
            title TEXT NOT NULL,
            date TEXT NOT NULL,
            startTime TEXT,
            endTime TEXT,
            location TEXT,
            memo TEXT,
            category TEXT,
            FOREIGN KEY (userId) REFERENCES users(id) ON DELETE CASCADE
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_schedules_user_date ON schedules(userId, date)",
        [],
    )?;

    // Generated daily summaries, one row per user and day
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schedule_summaries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            userId INTEGER NOT NULL,
            date TEXT NOT NULL,
            summary TEXT NOT NULL,
            weatherInfo TEXT,
            createdAt INTEGER NOT NULL,
            updatedAt INTEGER NOT NULL,
            FOREIGN KEY (userId) REFERENCES users(id) ON DELETE CASCADE,
            UNIQUE(userId, date)
        )",
        [],
    )?;

    Ok(())
}
