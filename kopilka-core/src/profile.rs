//! Who the advice is for: social status, country and city.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $label:literal, $alias:literal;)+ }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                #[serde(rename = $alias)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Russian label, as shown to the user and substituted into prompts
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = String;

            /// Accepts the Russian label or the lowercase English alias
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                $(
                    if s == $label || s.eq_ignore_ascii_case($alias) {
                        return Ok($name::$variant);
                    }
                )+
                let known: Vec<&str> = vec![$($label),+];
                Err(format!("unknown {}: {s:?} (expected one of {})", stringify!($name), known.join(", ")))
            }
        }
    };
}

labelled_enum! {
    SocialStatus {
        Student => "Студент", "student";
        Employed => "Работающий", "employed";
        Retired => "Пенсионер", "retired";
    }
}

labelled_enum! {
    Country {
        Kazakhstan => "Казахстан", "kazakhstan";
        Russia => "Россия", "russia";
        England => "Англия", "england";
    }
}

labelled_enum! {
    City {
        Astana => "Астана", "astana";
        Moscow => "Москва", "moscow";
        London => "Лондон", "london";
    }
}

/// Free-leisure and canteen guides exist only for students in Astana
pub fn offers_student_guides(city: City, status: SocialStatus) -> bool {
    city == City::Astana && status == SocialStatus::Student
}
