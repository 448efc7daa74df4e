#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Price(f64);

impl Price {
    pub fn new(value: f64) -> Result<Self, String> {
        if value.is_finite() && value >= 0.0 {
            Ok(Price(value))
        } else {
            Err("Price must be a non-negative finite number".to_string())
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}
