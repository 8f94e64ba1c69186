use quarry::Db;

use std::path::PathBuf;

/// Company schema. `Department`, `Job_Position` and `Sale` use rowid
/// aliases, so their keys are generated. `Employee` keys are person ids and
/// `Employee.SupervisorID` references `Employee` itself.
const SCHEMA: &str = "
CREATE TABLE Person (
    PersonID INTEGER PRIMARY KEY,
    LName VARCHAR(50) NOT NULL,
    FName VARCHAR(50) NOT NULL,
    Age INT CHECK (Age BETWEEN 0 AND 64),
    Gender TEXT CHECK (Gender IN ('M', 'F')),
    Email VARCHAR(100)
);

CREATE TABLE Department (
    DeptID INTEGER PRIMARY KEY,
    DeptName VARCHAR(50) NOT NULL
);

CREATE TABLE Job_Position (
    JobID INTEGER PRIMARY KEY,
    DeptID INT NOT NULL REFERENCES Department (DeptID),
    Title VARCHAR(50) NOT NULL
);

CREATE TABLE Employee (
    EmpID INT PRIMARY KEY REFERENCES Person (PersonID),
    JobRank VARCHAR(20),
    Title VARCHAR(50),
    SupervisorID INT REFERENCES Employee (EmpID)
);

CREATE TABLE Customer (
    CustomerID INT PRIMARY KEY REFERENCES Person (PersonID),
    PreferredSalesRep INT REFERENCES Employee (EmpID)
);

CREATE TABLE Sale (
    SaleID INTEGER PRIMARY KEY,
    CustomerID INT NOT NULL REFERENCES Customer (CustomerID),
    SalesPersonID INT REFERENCES Employee (EmpID),
    SaleDate DATE
);

CREATE TABLE Sale_Line (
    SaleID INT NOT NULL REFERENCES Sale (SaleID),
    LineNo INT NOT NULL,
    Qty INT NOT NULL,
    Price DECIMAL(10, 2),
    PRIMARY KEY (SaleID, LineNo)
);

CREATE VIEW Supervisor AS
    SELECT e.EmpID, p.LName FROM Employee e JOIN Person p ON p.PersonID = e.EmpID;
";

const LAST_NAMES: [&str; 10] = [
    "Smith", "Cole", "Nguyen", "Garcia", "Patel", "Brown", "Kim", "Lopez", "Wright", "Okafor",
];

const FIRST_NAMES: [&str; 6] = ["Ada", "Ben", "Cleo", "Dev", "Eve", "Finn"];

/// Rows per table after seeding.
pub const PEOPLE: i64 = 80;
pub const EMPLOYEES: i64 = 12;

fn seed() -> String {
    let mut sql = String::from("BEGIN;\n");

    for id in 1..=PEOPLE {
        let i = id as usize;
        sql.push_str(&format!(
            "INSERT INTO Person VALUES ({id}, '{}', '{}', {}, '{}', 'p{id}@example.com');\n",
            LAST_NAMES[i % LAST_NAMES.len()],
            FIRST_NAMES[i % FIRST_NAMES.len()],
            18 + (i % 40),
            if i % 2 == 0 { "F" } else { "M" },
        ));
    }

    sql.push_str(
        "
INSERT INTO Department VALUES (1, 'Engineering'), (2, 'Sales'), (3, 'Support'), (4, 'Research');

INSERT INTO Job_Position VALUES
    (1, 1, 'Developer'), (2, 2, 'Account Manager'), (3, 3, 'Support Engineer'), (4, 3, 'Support Lead');

INSERT INTO Employee VALUES
    (1, 'Lead', 'Manager', NULL),
    (2, 'Senior', 'Manager', 1),
    (3, 'Senior', 'Engineer', 1),
    (4, 'Mid', 'Developer', 1),
    (5, 'Mid', 'Analyst', 1),
    (6, 'Junior', 'Analyst', 1),
    (7, 'Senior', 'Consultant', 2),
    (8, 'Junior', 'Developer', 7),
    (9, 'Mid', 'Developer', 7),
    (10, 'Junior', 'Specialist', 7),
    (11, 'Mid', 'Specialist', 7),
    (12, 'Junior', 'Engineer', 3);

INSERT INTO Customer VALUES (50, 7), (51, 7), (52, 3), (53, NULL), (54, 2);

INSERT INTO Sale VALUES
    (1, 50, 7, '2024-01-05'),
    (2, 51, 3, '2024-01-09'),
    (3, 52, 7, '2024-02-11'),
    (4, 50, NULL, '2024-03-02');

INSERT INTO Sale_Line VALUES
    (1, 1, 2, 9.99), (1, 2, 1, 5.00), (2, 1, 3, 12.50), (3, 1, 1, 99.00), (4, 1, 4, 1.25);

COMMIT;
",
    );

    sql
}

/// A seeded company database in a temporary SQLite file, removed on drop.
pub struct Company {
    pub db: Db,
    path: PathBuf,
}

impl Company {
    pub async fn setup() -> Company {
        let path = std::env::temp_dir().join(format!("quarry-{}.db", uuid::Uuid::new_v4()));

        let connection = rusqlite::Connection::open(&path).unwrap();
        connection.execute_batch(SCHEMA).unwrap();
        connection.execute_batch(&seed()).unwrap();
        drop(connection);

        let db = Db::connect(&format!("sqlite:{}", path.display()))
            .await
            .unwrap();

        Company { db, path }
    }

    /// Connection URL of the database file.
    pub fn url(&self) -> String {
        format!("sqlite:{}", self.path.display())
    }

    /// Runs a scalar query directly against the file, bypassing the engine.
    pub fn scalar(&self, sql: &str) -> i64 {
        let connection = rusqlite::Connection::open(&self.path).unwrap();
        connection.query_row(sql, [], |row| row.get(0)).unwrap()
    }

    /// Runs raw SQL directly against the file.
    pub fn execute(&self, sql: &str) {
        let connection = rusqlite::Connection::open(&self.path).unwrap();
        connection.execute_batch(sql).unwrap();
    }
}

impl Drop for Company {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}
