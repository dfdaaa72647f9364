/// Joins an iterator of [`std::fmt::Display`]'ables into a new [`String`].
pub(crate) fn iter_join<I, T>(iter: I, delim: &str) -> String
where
    I: IntoIterator<Item = T>,
    T: std::fmt::Display,
{
    let mut s = String::new();
    for item in iter {
        if !s.is_empty() {
            s.push_str(delim);
        }
        s.push_str(&item.to_string());
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_with_delimiter() {
        assert_eq!(iter_join([1, 2, 3], ","), "1,2,3");
        assert_eq!(iter_join(Vec::<u32>::new(), ","), "");
        assert_eq!(iter_join(["solo"], " "), "solo");
    }
}
