use super::errors::Result;
use super::util::read_latin1;
use log::{info, warn};
use std::path::Path;
use std::str::FromStr;

/// One row of the object table (`csv.dat`).
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectEntry {
    pub bod: String,
    pub name: String,
    pub unknown_value: f32,
    pub unknown_flags: i32,
    pub unknown_name: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjectTable {
    pub entries: Vec<ObjectEntry>,
}

impl ObjectTable {
    pub fn from_file<P: AsRef<Path>>(path: &P) -> Result<ObjectTable> {
        let path = path.as_ref();
        let table = Self::parse(&read_latin1(&path)?);
        info!("Loaded {} objects from {:?}.", table.entries.len(), path);
        Ok(table)
    }

    /// Parses whitespace separated `bod name float int string` rows. Short or malformed rows are
    /// skipped.
    pub fn parse(text: &str) -> ObjectTable {
        let entries = text
            .lines()
            .filter_map(|line| {
                let entry = parse_row(line);
                if entry.is_none() {
                    warn!("Skipping object row {:?}: not enough parameters.", line);
                }
                entry
            })
            .collect();
        ObjectTable { entries }
    }

    pub fn find(&self, name: &str) -> Option<&ObjectEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }
}

fn parse_row(line: &str) -> Option<ObjectEntry> {
    let mut tokens = line.split_whitespace();
    Some(ObjectEntry {
        bod: tokens.next()?.to_owned(),
        name: tokens.next()?.to_owned(),
        unknown_value: f32::from_str(tokens.next()?).ok()?,
        unknown_flags: i32::from_str(tokens.next()?).ok()?,
        unknown_name: tokens.next()?.to_owned(),
    })
}

#[cfg(test)]
mod test {
    use super::ObjectTable;

    #[test]
    fn parse_rows() {
        let table = ObjectTable::parse(
            "Antorcha.bod antorcha1 1.5 0 fuego\n\
             Barril.bod barril 2 1\n\
             Cofre.bod cofre x 1 nada\n\
             Puerta.bod puerta 0.25 -3 madera extra\n",
        );
        assert_eq!(table.entries.len(), 2);
        assert_eq!(table.entries[0].bod, "Antorcha.bod");
        assert_eq!(table.entries[0].unknown_value, 1.5);
        let puerta = table.find("puerta").unwrap();
        assert_eq!(puerta.unknown_flags, -3);
        assert_eq!(puerta.unknown_name, "madera");
        assert!(table.find("barril").is_none());
    }
}
