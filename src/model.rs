use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use std::borrow::Cow;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Sujet de la garde de jour (premier nom d'une journée).
pub const SERVICE_SUBJECT: &str = "Service";
/// Sujet de l'astreinte de nuit (second nom d'une journée).
pub const CALL_SUBJECT: &str = "Call";

/// Colonnes fixes de l'export CSV.
pub const CSV_HEADER: [&str; 9] = [
    "Subject",
    "Start Date",
    "Start Time",
    "End Date",
    "End Time",
    "All Day Event",
    "Description",
    "Location",
    "Private",
];

const CSV_DATE: &str = "%m/%d/%y";
const CSV_TIME: &str = "%H:%M";

/// Étendue temporelle d'un événement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventSpan {
    /// Journée entière : de la date (incluse) au lendemain (exclu).
    AllDay,
    /// Créneau en heure locale ; `end` peut tomber le lendemain.
    Timed {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

/// Obligation planifiée sur une date (Service, Call ou rôle annexe).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DutyEvent {
    pub subject: String,
    pub date: NaiveDate,
    pub span: EventSpan,
    pub description: String,
    pub location: String,
    pub private: bool,
}

impl DutyEvent {
    pub fn all_day<S: Into<String>>(subject: S, date: NaiveDate) -> Self {
        Self {
            subject: subject.into(),
            date,
            span: EventSpan::AllDay,
            description: String::new(),
            location: String::new(),
            private: true,
        }
    }

    /// Crée un événement horaire en validant que `end >= start`.
    pub fn timed<S: Into<String>>(
        subject: S,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Self, String> {
        if end < start {
            return Err("end must not be before start".to_string());
        }
        Ok(Self {
            subject: subject.into(),
            date: start.date(),
            span: EventSpan::Timed { start, end },
            description: String::new(),
            location: String::new(),
            private: true,
        })
    }

    /// Créneau de nuit : commence à `date` + `start`, finit le lendemain à `end`.
    pub fn overnight<S: Into<String>>(
        subject: S,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<Self, String> {
        let next = date
            .checked_add_days(Days::new(1))
            .ok_or_else(|| format!("no day after {date}"))?;
        Self::timed(subject, date.and_time(start), next.and_time(end))
    }

    pub fn is_all_day(&self) -> bool {
        matches!(self.span, EventSpan::AllDay)
    }

    pub fn start(&self) -> Option<NaiveDateTime> {
        match self.span {
            EventSpan::AllDay => None,
            EventSpan::Timed { start, .. } => Some(start),
        }
    }

    pub fn end(&self) -> Option<NaiveDateTime> {
        match self.span {
            EventSpan::AllDay => None,
            EventSpan::Timed { end, .. } => Some(end),
        }
    }

    /// Copie indépendante avec un autre sujet ; l'original reste intact.
    pub fn with_subject<S: Into<String>>(&self, subject: S) -> Self {
        Self {
            subject: subject.into(),
            ..self.clone()
        }
    }

    /// Projection sur les 9 colonnes CSV. Les champs horaires d'un
    /// événement journée entière restent vides mais présents.
    pub fn csv_fields(&self) -> [String; 9] {
        let (start_time, end_date, end_time) = match &self.span {
            EventSpan::AllDay => (String::new(), String::new(), String::new()),
            EventSpan::Timed { start, end } => (
                start.format(CSV_TIME).to_string(),
                end.format(CSV_DATE).to_string(),
                end.format(CSV_TIME).to_string(),
            ),
        };
        [
            self.subject.clone(),
            self.date.format(CSV_DATE).to_string(),
            start_time,
            end_date,
            end_time,
            bool_label(self.is_all_day()).to_string(),
            self.description.clone(),
            self.location.clone(),
            bool_label(self.private).to_string(),
        ]
    }
}

fn bool_label(flag: bool) -> &'static str {
    if flag {
        "True"
    } else {
        "False"
    }
}

/// Événement rattaché à une personne.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonAssignment {
    pub person: String,
    pub event: DutyEvent,
}

impl PersonAssignment {
    /// Crée une assignation en validant que le nom n'est pas vide.
    pub fn new<P: Into<String>>(person: P, event: DutyEvent) -> Result<Self, String> {
        let person = person.into();
        if person.trim().is_empty() {
            return Err("person name cannot be empty".to_string());
        }
        Ok(Self { person, event })
    }

    /// Sujet préfixé par la personne, ex. `Smith-Call`.
    pub fn labelled_subject(&self) -> String {
        format!("{}-{}", self.person, self.event.subject)
    }
}

/// Enregistrement produit par l'extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Assignment(PersonAssignment),
    Event(DutyEvent),
}

impl Record {
    pub fn event(&self) -> &DutyEvent {
        match self {
            Record::Assignment(a) => &a.event,
            Record::Event(e) => e,
        }
    }

    pub fn person(&self) -> Option<&str> {
        match self {
            Record::Assignment(a) => Some(a.person.as_str()),
            Record::Event(_) => None,
        }
    }

    /// Événement à émettre pour `selector`, ou `None` si filtré.
    ///
    /// Avec `all`, une assignation donne une copie dont le sujet est préfixé
    /// par la personne ; un événement sans personne n'est émis qu'avec `all`.
    pub fn select(&self, selector: &Selector) -> Option<Cow<'_, DutyEvent>> {
        match (self, selector) {
            (Record::Assignment(a), Selector::All) => {
                Some(Cow::Owned(a.event.with_subject(a.labelled_subject())))
            }
            (Record::Assignment(a), Selector::Person(name)) if a.person == *name => {
                Some(Cow::Borrowed(&a.event))
            }
            (Record::Assignment(_), Selector::Person(_)) => None,
            (Record::Event(e), Selector::All) => Some(Cow::Borrowed(e)),
            (Record::Event(_), Selector::Person(_)) => None,
        }
    }
}

impl From<PersonAssignment> for Record {
    fn from(value: PersonAssignment) -> Self {
        Record::Assignment(value)
    }
}

impl From<DutyEvent> for Record {
    fn from(value: DutyEvent) -> Self {
        Record::Event(value)
    }
}

/// Filtre des sérialiseurs : une personne, ou `all`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    All,
    Person(String),
}

impl Selector {
    pub const ALL: &'static str = "all";

    pub fn as_str(&self) -> &str {
        match self {
            Selector::All => Self::ALL,
            Selector::Person(name) => name,
        }
    }
}

impl From<&str> for Selector {
    fn from(value: &str) -> Self {
        if value == Self::ALL {
            Selector::All
        } else {
            Selector::Person(value.to_string())
        }
    }
}

impl FromStr for Selector {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Selector::from(s))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
