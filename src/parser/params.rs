//! CSI parameter parsing
//!
//! Parameters are semicolon-separated numbers; a colon attaches
//! subparameters to the preceding parameter (used by SGR for underline
//! styles and colon-form colors).

/// Maximum number of parameters tracked per sequence
const MAX_PARAMS: usize = 32;

/// Parsed CSI parameters
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params {
    /// Parameter values; 0 means default/unspecified
    values: Vec<u16>,
    /// Colon-separated subparameters per parameter
    subparams: Vec<Vec<u16>>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn from_slice(values: &[u16]) -> Self {
        Self {
            values: values.to_vec(),
            subparams: vec![Vec::new(); values.len()],
        }
    }

    /// Parse the parameter bytes of a CSI sequence
    pub fn parse(bytes: &[u8]) -> Self {
        let mut params = Self::new();
        let mut current: u16 = 0;
        let mut main: Option<u16> = None;
        let mut subs: Vec<u16> = Vec::new();
        let mut seen_any = false;

        fn finish(
            params: &mut Params,
            current: &mut u16,
            main: &mut Option<u16>,
            subs: &mut Vec<u16>,
        ) {
            let value = match main.take() {
                Some(value) => {
                    subs.push(*current);
                    value
                }
                None => *current,
            };
            if params.values.len() < MAX_PARAMS {
                params.values.push(value);
                params.subparams.push(std::mem::take(subs));
            } else {
                subs.clear();
            }
            *current = 0;
        }

        for &byte in bytes {
            match byte {
                b'0'..=b'9' => {
                    seen_any = true;
                    current = current
                        .saturating_mul(10)
                        .saturating_add((byte - b'0') as u16);
                }
                b':' => {
                    seen_any = true;
                    match main {
                        None => main = Some(current),
                        Some(_) => subs.push(current),
                    }
                    current = 0;
                }
                b';' => {
                    seen_any = true;
                    finish(&mut params, &mut current, &mut main, &mut subs);
                }
                _ => {}
            }
        }
        if seen_any {
            finish(&mut params, &mut current, &mut main, &mut subs);
        }
        params
    }

    /// Parameter at index, treating 0 and missing as absent
    pub fn get(&self, index: usize) -> Option<u16> {
        self.values.get(index).copied().filter(|&v| v != 0)
    }

    /// Parameter at index with a default for 0/missing
    pub fn get_or(&self, index: usize, default: u16) -> u16 {
        self.get(index).unwrap_or(default)
    }

    /// Raw value at index (0 if not present)
    pub fn raw(&self, index: usize) -> u16 {
        self.values.get(index).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn subparams(&self, index: usize) -> &[u16] {
        self.subparams
            .get(index)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.values.iter().copied()
    }
}
