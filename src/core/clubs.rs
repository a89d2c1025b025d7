use crate::core::store::Store;

// New clubs get placeholder metadata until someone curates it, same as the
// original registry did.
const DEFAULT_CITY: &str = "Unknown";
const DEFAULT_FOUNDED_YEAR: i32 = 1900;

pub fn add_club(store: &mut Store, name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        return "Името не може да бъде празно.".to_string();
    }

    if store.find_club_by_name(name).is_some() {
        return "Клуб с това име вече съществува.".to_string();
    }

    store.add_club(name, DEFAULT_CITY, DEFAULT_FOUNDED_YEAR);
    format!("Клуб '{}' беше добавен успешно.", name)
}

pub fn list_clubs(store: &Store) -> String {
    if store.clubs().is_empty() {
        return "Няма добавени клубове.".to_string();
    }

    store
        .clubs()
        .iter()
        .map(|club| format!("{}. {}", club.id, club.name))
        .collect::<Vec<String>>()
        .join("\n")
}

pub fn delete_club(store: &mut Store, name: &str) -> String {
    if store.find_club_by_name(name).is_none() {
        return "Няма такъв клуб.".to_string();
    }

    store.remove_club(name);
    format!("Клуб '{}' беше изтрит.", name.trim())
}
