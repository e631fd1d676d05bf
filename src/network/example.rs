/// One training example: a fixed-width feature vector and its target.
#[derive(Debug, Clone, PartialEq)]
pub struct Example {
    pub features: Vec<f64>,
    pub label: f64,
}

impl Example {
    pub fn new(features: Vec<f64>, label: f64) -> Example {
        Example { features, label }
    }
}

impl From<(Vec<f64>, f64)> for Example {
    fn from((features, label): (Vec<f64>, f64)) -> Example {
        Example { features, label }
    }
}
