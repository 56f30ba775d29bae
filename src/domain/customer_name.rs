// Matches the VARCHAR(100) name columns of customers and products
pub const MAX_NAME_LENGTH: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct CustomerName(String);

impl CustomerName{
    /// Accepts any name with at least one non-whitespace character and at
    /// most `MAX_NAME_LENGTH` characters.
    pub fn parse(name: Option<String>) -> Result<CustomerName, String>{
        let name = match name {
            Some(name) if !name.trim().is_empty() => name,
            _ => return Err("Name is required".to_string())
        };

        check_name_length(&name)?;
        Ok(Self(name))
    }

    pub fn inner(self) -> String {
        self.0
    }
}

pub fn check_name_length(name: &str) -> Result<(), String>{
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(format!("Name must be at most {} characters", MAX_NAME_LENGTH))
    }

    Ok(())
}

impl AsRef<str> for CustomerName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CustomerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}
