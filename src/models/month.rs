//! Calendar months and fixed twelve-month maps
//!
//! `MonthMap<T>` always holds exactly one value per calendar month. On disk it
//! is a JSON object keyed by lowercase month name; a document missing a month
//! (or carrying an unknown key) fails to deserialize.

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

/// A calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    /// All months in calendar order
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// Zero-based position in the year (January = 0)
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Month from its calendar number (January = 1)
    pub fn from_number(number: u32) -> Option<Self> {
        (number as usize)
            .checked_sub(1)
            .and_then(Self::from_index)
    }

    /// Lowercase full name, as used for storage keys
    pub const fn name(self) -> &'static str {
        match self {
            Month::January => "january",
            Month::February => "february",
            Month::March => "march",
            Month::April => "april",
            Month::May => "may",
            Month::June => "june",
            Month::July => "july",
            Month::August => "august",
            Month::September => "september",
            Month::October => "october",
            Month::November => "november",
            Month::December => "december",
        }
    }

    /// Three-letter column label ("Jan")
    pub const fn short_label(self) -> &'static str {
        match self {
            Month::January => "Jan",
            Month::February => "Feb",
            Month::March => "Mar",
            Month::April => "Apr",
            Month::May => "May",
            Month::June => "Jun",
            Month::July => "Jul",
            Month::August => "Aug",
            Month::September => "Sep",
            Month::October => "Oct",
            Month::November => "Nov",
            Month::December => "Dec",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name();
        let mut chars = name.chars();
        if let Some(first) = chars.next() {
            write!(f, "{}{}", first.to_ascii_uppercase(), chars.as_str())?;
        }
        Ok(())
    }
}

impl FromStr for Month {
    type Err = String;

    /// Accepts a calendar number ("3"), a full name ("march") or any
    /// unambiguous prefix of at least three letters ("mar").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();

        if let Ok(number) = s.parse::<u32>() {
            return Month::from_number(number)
                .ok_or_else(|| format!("Month number must be 1-12, got {}", number));
        }

        if s.len() >= 3 {
            if let Some(month) = Month::ALL.iter().find(|m| m.name().starts_with(&s)) {
                return Ok(*month);
            }
        }

        Err(format!("Unknown month: '{}'", s))
    }
}

/// One value per calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MonthMap<T>([T; 12]);

impl<T> MonthMap<T> {
    pub fn from_array(values: [T; 12]) -> Self {
        Self(values)
    }

    /// Build a map by evaluating `f` for every month
    pub fn from_fn(mut f: impl FnMut(Month) -> T) -> Self {
        Self(std::array::from_fn(|i| f(Month::ALL[i])))
    }

    pub fn as_array(&self) -> &[T; 12] {
        &self.0
    }

    pub fn into_array(self) -> [T; 12] {
        self.0
    }

    /// Iterate `(month, value)` pairs in calendar order
    pub fn iter(&self) -> impl Iterator<Item = (Month, &T)> {
        Month::ALL.iter().copied().zip(self.0.iter())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }

    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> MonthMap<U> {
        MonthMap(std::array::from_fn(|i| f(&self.0[i])))
    }
}

impl<T: Clone> MonthMap<T> {
    /// Same value in every month
    pub fn filled(value: T) -> Self {
        Self::from_fn(|_| value.clone())
    }
}

impl<T> Index<Month> for MonthMap<T> {
    type Output = T;

    fn index(&self, month: Month) -> &T {
        &self.0[month.index()]
    }
}

impl<T> IndexMut<Month> for MonthMap<T> {
    fn index_mut(&mut self, month: Month) -> &mut T {
        &mut self.0[month.index()]
    }
}

impl<T: Serialize> Serialize for MonthMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(12))?;
        for (month, value) in self.iter() {
            map.serialize_entry(month.name(), value)?;
        }
        map.end()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for MonthMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(MonthMapVisitor(PhantomData))
    }
}

struct MonthMapVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for MonthMapVisitor<T> {
    type Value = MonthMap<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object with exactly the twelve month keys")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut slots: [Option<T>; 12] = std::array::from_fn(|_| None);

        while let Some(month) = access.next_key::<Month>()? {
            let slot = &mut slots[month.index()];
            if slot.is_some() {
                return Err(de::Error::custom(format!("duplicate month key '{}'", month.name())));
            }
            *slot = Some(access.next_value()?);
        }

        if let Some(missing) = slots.iter().position(Option::is_none) {
            return Err(de::Error::custom(format!(
                "missing month key '{}'",
                Month::ALL[missing].name()
            )));
        }

        let values: Vec<T> = slots.into_iter().flatten().collect();
        let values: [T; 12] = values
            .try_into()
            .map_err(|_| de::Error::custom("expected exactly twelve months"))?;
        Ok(MonthMap(values))
    }
}
