//! The fixed resume schema exchanged with the model and fed to the renderer.
//!
//! Deserialization is deliberately forgiving: model output drifts (numbers where
//! strings belong, `null` lists, stray `null` array elements), and a
//! slightly malformed field should cost that field, not the whole request.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resume {
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Profile URL without scheme, e.g. `linkedin.com/in/ada`.
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    /// Bare GitHub username.
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub education: Vec<Education>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub experience: Vec<Experience>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub projects: Vec<Project>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub skills: Skills,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    #[serde(default, deserialize_with = "lenient::string")]
    pub institution: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub degree: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub dates: Option<String>,
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    #[serde(default, deserialize_with = "lenient::string")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub dates: Option<String>,
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub description: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub technologies: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub dates: Option<String>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub description: Vec<String>,
}

/// Comma-separated skill lists, one string per category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skills {
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub languages: Option<String>,
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub frameworks: Option<String>,
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub developer_tools: Option<String>,
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub libraries: Option<String>,
}

impl Skills {
    pub fn is_empty(&self) -> bool {
        [
            &self.languages,
            &self.frameworks,
            &self.developer_tools,
            &self.libraries,
        ]
        .iter()
        .all(|s| s.as_deref().map_or(true, |v| v.trim().is_empty()))
    }
}

impl Resume {
    /// True when the model gave back nothing worth rendering.
    pub fn is_empty(&self) -> bool {
        self.name.as_deref().map_or(true, |n| n.trim().is_empty())
            && self.education.is_empty()
            && self.experience.is_empty()
            && self.projects.is_empty()
            && self.skills.is_empty()
    }
}

mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn scalar_to_string(value: Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Strings, numbers and booleans become `Some(text)`; anything else is absent.
    pub fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.and_then(scalar_to_string))
    }

    /// An array of scalars; non-array values yield an empty list.
    pub fn strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Array(items)) => items.into_iter().filter_map(scalar_to_string).collect(),
            _ => Vec::new(),
        })
    }

    /// An array of objects; elements that do not fit `T` are dropped.
    pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter(Value::is_object)
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
            _ => Vec::new(),
        })
    }

    /// An object that falls back to `T::default()` when missing or malformed.
    pub fn object<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value
            .filter(Value::is_object)
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default())
    }
}
