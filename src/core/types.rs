use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Club {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub founded_year: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: i64,
    pub club_id: i64,
    pub full_name: String,
    pub birth_date: String,
    pub nationality: String,
    pub position: String,
    pub number: i32,
    pub status: String,
}

impl Club {
    pub fn new(id: i64, name: &str, city: &str, founded_year: i32) -> Self {
        Self {
            id,
            name: name.to_string(),
            city: city.to_string(),
            founded_year,
        }
    }
}

impl Player {
    /// One-line listing format used by `list_players`.
    pub fn listing_line(&self, club_name: &str) -> String {
        format!(
            "ID: {} | {} | {} | {} | #{} | {} | {} | {}",
            self.id,
            self.full_name,
            club_name,
            self.position,
            self.number,
            self.nationality,
            self.birth_date,
            self.status
        )
    }
}
