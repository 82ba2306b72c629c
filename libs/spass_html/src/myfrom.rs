use kstring::KString;

// FUTURE: figure out how to inherit from `From` (and keep all the
// existing From definitions for KString). It doesn't work out of the
// box (various errors).
pub trait MyFrom<T> {
    fn myfrom(s: T) -> Self;
}

// Can't do KString::from_static: no way to have a separate trait impl
// for &'static.
impl MyFrom<&str> for KString {
    fn myfrom(s: &str) -> Self {
        KString::from_ref(s)
    }
}

impl MyFrom<&&str> for KString {
    fn myfrom(s: &&str) -> Self {
        KString::from_ref(*s)
    }
}

impl MyFrom<&String> for KString {
    fn myfrom(s: &String) -> Self {
        KString::from_ref(s)
    }
}

impl MyFrom<String> for KString {
    fn myfrom(s: String) -> Self {
        KString::from_string(s)
    }
}

impl MyFrom<&KString> for KString {
    fn myfrom(s: &KString) -> Self {
        s.clone()
    }
}

impl MyFrom<KString> for KString {
    fn myfrom(s: KString) -> Self {
        s
    }
}

// Attribute values like `size` or `rows` are numbers on the calling
// side, but always strings once stored.
macro_rules! myfrom_display {
    ($($t:ty)*) => {
        $(
            impl MyFrom<$t> for KString {
                fn myfrom(val: $t) -> Self {
                    KString::from_string(val.to_string())
                }
            }
        )*
    }
}

myfrom_display!(usize u32 u64 i32 i64 f64 bool char);


/// Shorthand for `KString::myfrom`.
pub fn ks<T>(s: T) -> KString
where KString: MyFrom<T>
{
    KString::myfrom(s)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_numbers() {
        assert_eq!(ks(20usize).as_str(), "20");
        assert_eq!(ks(-1i64).as_str(), "-1");
        assert_eq!(ks(true).as_str(), "true");
        assert_eq!(ks(&String::from("abc")).as_str(), "abc");
    }
}
