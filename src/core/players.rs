use chrono::{NaiveDate, Utc};

use crate::core::store::Store;
use crate::core::types::Player;

pub const POSITIONS: &[&str] = &["GK", "DF", "MF", "FW"];

const INVALID_POSITION: &str = "Невалидна позиция. Използвайте една от: GK, DF, MF, FW.";
const INVALID_NUMBER: &str = "Невалиден номер. Номерът трябва да бъде между 1 и 99.";
const INVALID_BIRTH_DATE: &str =
    "Невалидна дата на раждане. Използвайте формат YYYY-MM-DD и дата не може да бъде в бъдещето.";

pub fn validate_position(position: &str) -> bool {
    POSITIONS.contains(&position.trim().to_uppercase().as_str())
}

pub fn validate_number(number: &str) -> bool {
    match number.trim().parse::<i32>() {
        Ok(n) => (1..=99).contains(&n),
        Err(_) => false,
    }
}

/// ISO calendar date, not later than today.
pub fn validate_birth_date(birth_date: &str) -> bool {
    match NaiveDate::parse_from_str(birth_date.trim(), "%Y-%m-%d") {
        Ok(date) => date <= Utc::now().date_naive(),
        Err(_) => false,
    }
}

pub fn add_player(
    store: &mut Store,
    club: &str,
    full_name: &str,
    birth_date: &str,
    nationality: &str,
    position: &str,
    number: &str,
    status: &str,
) -> String {
    if full_name.trim().is_empty() {
        return "Името на играча не може да бъде празно.".to_string();
    }
    if !validate_birth_date(birth_date) {
        return INVALID_BIRTH_DATE.to_string();
    }
    if nationality.trim().is_empty() {
        return "Националността не може да бъде празна.".to_string();
    }
    if !validate_position(position) {
        return INVALID_POSITION.to_string();
    }
    if !validate_number(number) {
        return INVALID_NUMBER.to_string();
    }
    if status.trim().is_empty() {
        return "Статусът не може да бъде празен.".to_string();
    }

    let club_id = match store.resolve_club_id(club) {
        Some(id) => id,
        None => return format!("Клуб '{}' не съществува.", club),
    };

    if store.player_exists_in_club(full_name, club_id) {
        return format!("Играч с име '{}' вече съществува в този клуб.", full_name);
    }

    let jersey_number = match number.trim().parse::<i32>() {
        Ok(n) => n,
        Err(_) => return INVALID_NUMBER.to_string(),
    };

    store.add_player(Player {
        id: 0, // assigned by the store
        club_id,
        full_name: full_name.trim().to_string(),
        birth_date: birth_date.trim().to_string(),
        nationality: nationality.trim().to_string(),
        position: position.trim().to_uppercase(),
        number: jersey_number,
        status: status.trim().to_string(),
    });

    format!("Играч '{}' беше добавен успешно.", full_name.trim())
}

/// List players, optionally narrowed to one club. Players whose club no
/// longer exists are not listed.
pub fn list_players(store: &Store, club: Option<&str>) -> String {
    let club_filter = match club {
        Some(identifier) => match store.resolve_club_id(identifier) {
            Some(id) => Some(id),
            None => return format!("Клуб '{}' не съществува.", identifier),
        },
        None => None,
    };

    let mut rows: Vec<(&Player, &str)> = store
        .players()
        .iter()
        .filter(|p| club_filter.map_or(true, |id| p.club_id == id))
        .filter_map(|p| store.find_club_by_id(p.club_id).map(|c| (p, c.name.as_str())))
        .collect();

    rows.sort_by(|a, b| a.1.cmp(b.1).then(a.0.number.cmp(&b.0.number)));

    if rows.is_empty() {
        return "Няма намерени играчи.".to_string();
    }

    rows.iter()
        .map(|(player, club_name)| player.listing_line(club_name))
        .collect::<Vec<String>>()
        .join("\n")
}

pub fn update_player_position(store: &mut Store, identifier: &str, new_position: &str) -> String {
    if !validate_position(new_position) {
        return INVALID_POSITION.to_string();
    }

    let player_id = match store.resolve_player_id(identifier) {
        Some(id) => id,
        None => return format!("Играч '{}' не съществува.", identifier),
    };

    let position = new_position.trim().to_uppercase();
    store.update_player(player_id, |p| p.position = position.clone());
    format!("Позицията на играч с ID {} беше обновена на {}.", player_id, position)
}

pub fn update_player_number(store: &mut Store, identifier: &str, new_number: &str) -> String {
    if !validate_number(new_number) {
        return INVALID_NUMBER.to_string();
    }

    let player_id = match store.resolve_player_id(identifier) {
        Some(id) => id,
        None => return format!("Играч '{}' не съществува.", identifier),
    };

    let number = match new_number.trim().parse::<i32>() {
        Ok(n) => n,
        Err(_) => return INVALID_NUMBER.to_string(),
    };
    store.update_player(player_id, |p| p.number = number);
    format!("Номерът на играч с ID {} беше сменен на {}.", player_id, number)
}

pub fn update_player_status(store: &mut Store, identifier: &str, new_status: &str) -> String {
    if new_status.trim().is_empty() {
        return "Статусът не може да бъде празен.".to_string();
    }

    let player_id = match store.resolve_player_id(identifier) {
        Some(id) => id,
        None => return format!("Играч '{}' не съществува.", identifier),
    };

    let status = new_status.trim().to_string();
    store.update_player(player_id, |p| p.status = status.clone());
    format!("Статусът на играч с ID {} беше обновен на '{}'.", player_id, status)
}

pub fn delete_player(store: &mut Store, identifier: &str) -> String {
    let player_id = match store.resolve_player_id(identifier) {
        Some(id) => id,
        None => return format!("Играч '{}' не съществува.", identifier),
    };

    store.remove_player(player_id);
    format!("Играч с ID {} беше изтрит.", player_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn store_with_club(name: &str) -> (Store, i64) {
        let dir: PathBuf = std::env::temp_dir().join(format!("ligabot_players_{}", name));
        let _ = std::fs::create_dir_all(&dir);
        let _ = std::fs::remove_file(dir.join("league.json"));
        let mut store = Store::new(&dir);
        let club_id = store.add_club("Левски София", "София", 1914);
        (store, club_id)
    }

    fn add_ivan(store: &mut Store) -> String {
        add_player(
            store,
            "Левски София",
            "Иван Иванов",
            "1995-03-15",
            "България",
            "GK",
            "1",
            "Активен",
        )
    }

    #[test]
    fn test_validators() {
        assert!(validate_position("GK"));
        assert!(validate_position("mf"));
        assert!(!validate_position("ST"));

        assert!(validate_number("1"));
        assert!(validate_number("99"));
        assert!(!validate_number("0"));
        assert!(!validate_number("100"));
        assert!(!validate_number("abc"));

        assert!(validate_birth_date("1995-03-15"));
        assert!(!validate_birth_date("2195-03-15"));
        assert!(!validate_birth_date("15.03.1995"));
    }

    #[test]
    fn test_add_player_happy_path_and_duplicate() {
        let (mut store, _) = store_with_club("add");

        assert_eq!(add_ivan(&mut store), "Играч 'Иван Иванов' беше добавен успешно.");
        assert_eq!(
            add_ivan(&mut store),
            "Играч с име 'Иван Иванов' вече съществува в този клуб."
        );
    }

    #[test]
    fn test_add_player_unknown_club() {
        let (mut store, _) = store_with_club("noclub");
        let result = add_player(
            &mut store,
            "Несъществуващ",
            "Тест Тестов",
            "2000-01-01",
            "България",
            "GK",
            "1",
            "Активен",
        );
        assert_eq!(result, "Клуб 'Несъществуващ' не съществува.");
    }

    #[test]
    fn test_updates_resolve_by_name_and_by_id() {
        let (mut store, _) = store_with_club("update");
        add_ivan(&mut store);

        assert_eq!(
            update_player_number(&mut store, "Иван Иванов", "99"),
            "Номерът на играч с ID 1 беше сменен на 99."
        );
        assert_eq!(
            update_player_position(&mut store, "1", "MF"),
            "Позицията на играч с ID 1 беше обновена на MF."
        );
        assert_eq!(
            update_player_status(&mut store, "Иван Иванов", "Контузиран"),
            "Статусът на играч с ID 1 беше обновен на 'Контузиран'."
        );

        let player = store.find_player_by_id(1).unwrap();
        assert_eq!(player.number, 99);
        assert_eq!(player.position, "MF");
        assert_eq!(player.status, "Контузиран");
    }

    #[test]
    fn test_invalid_updates_leave_player_untouched() {
        let (mut store, _) = store_with_club("invalid");
        add_ivan(&mut store);

        assert_eq!(update_player_position(&mut store, "Иван Иванов", "ST"), INVALID_POSITION);
        assert_eq!(update_player_number(&mut store, "Иван Иванов", "150"), INVALID_NUMBER);
        assert_eq!(
            update_player_number(&mut store, "Несъществуващ", "10"),
            "Играч 'Несъществуващ' не съществува."
        );

        let player = store.find_player_by_id(1).unwrap();
        assert_eq!(player.position, "GK");
        assert_eq!(player.number, 1);
    }

    #[test]
    fn test_list_and_delete() {
        let (mut store, _) = store_with_club("list");
        add_ivan(&mut store);

        let listing = list_players(&store, None);
        assert!(listing.contains("Иван Иванов"));
        assert!(listing.contains("Левски София"));

        let filtered = list_players(&store, Some("левски софия"));
        assert!(filtered.contains("Иван Иванов"));
        assert_eq!(
            list_players(&store, Some("Няма такъв")),
            "Клуб 'Няма такъв' не съществува."
        );

        assert_eq!(delete_player(&mut store, "Иван Иванов"), "Играч с ID 1 беше изтрит.");
        assert_eq!(list_players(&store, None), "Няма намерени играчи.");
    }
}
