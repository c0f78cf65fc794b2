pub mod common;

#[cfg(test)]
mod test_abilities;


#[cfg(test)]
mod test_capture;
