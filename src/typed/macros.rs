//! Declarative record and enum bindings.

/// Implement [`FromYaml`](crate::typed::FromYaml) for a struct.
///
/// Each listed field is read from the key named after it, or from the key
/// given with `as`. An `alias` key wins over the plain key whenever both are
/// present. Unlisted fields and absent keys keep their `Default` value.
///
/// ```
/// use typed_yaml::{Document, CoercionContext, yaml_record};
///
/// #[derive(Debug, Default)]
/// struct Person {
///     name: Option<String>,
///     nick_name: Option<String>,
///     age: Option<i32>,
/// }
///
/// yaml_record!(Person {
///     name,
///     nick_name as "nickName" alias "nick-name",
///     age,
/// });
///
/// let doc = Document::from_yaml_str("name: Ahmed\nnick-name: Abo Salah\nage: '30'").unwrap();
/// let person: Person =
///     typed_yaml::typed::from_value(doc.root(), &CoercionContext::default(), true).unwrap();
/// assert_eq!(person.nick_name.as_deref(), Some("Abo Salah"));
/// assert_eq!(person.age, Some(30));
/// ```
///
/// Fields of primitive type (`i32`, `bool`, ...) must be wrapped in `Option`;
/// a bare primitive field makes every conversion of the record fail.
#[macro_export]
macro_rules! yaml_record {
    ($ty:ident { $($field:ident $(as $key:literal)? $(alias $alias:literal)?),* $(,)? }) => {
        impl $crate::typed::FromYaml for $ty {
            fn type_descriptor() -> $crate::coerce::TypeDescriptor {
                fn fields() -> ::std::vec::Vec<$crate::coerce::FieldDescriptor> {
                    ::std::vec![$(
                        $crate::yaml_record!(@alias
                            $crate::coerce::FieldDescriptor::of(
                                $crate::yaml_record!(@key $field $($key)?),
                                |r: &$ty| &r.$field,
                            )
                            $(, $alias)?
                        )
                    ),*]
                }
                $crate::coerce::TypeDescriptor::Record(
                    $crate::coerce::RecordDescriptor::registered(::std::stringify!($ty), fields),
                )
            }

            fn from_coerced(
                coerced: $crate::coerce::Coerced,
            ) -> $crate::error::Result<Self> {
                let fields = match coerced {
                    $crate::coerce::Coerced::Record { fields, .. } => fields,
                    other => {
                        return ::std::result::Result::Err($crate::typed::unexpected(
                            &other,
                            ::std::stringify!($ty),
                        ))
                    }
                };

                let mut record = <$ty as ::std::default::Default>::default();
                #[allow(unused_variables)]
                for (key, value) in fields {
                    $(
                        if key == $crate::yaml_record!(@key $field $($key)?) {
                            record.$field = $crate::typed::FromYaml::from_coerced(value)?;
                            continue;
                        }
                    )*
                }
                ::std::result::Result::Ok(record)
            }
        }
    };
    (@key $field:ident) => { ::std::stringify!($field) };
    (@key $field:ident $key:literal) => { $key };
    (@alias $desc:expr) => { $desc };
    (@alias $desc:expr, $alias:literal) => { $desc.with_alias($alias) };
}

/// Implement [`FromYaml`](crate::typed::FromYaml) for a fieldless enum.
///
/// Each variant is paired with its exact spelling in documents.
///
/// ```
/// use typed_yaml::{CoercionContext, yaml_enum};
/// use serde_json::json;
///
/// #[derive(Debug, PartialEq)]
/// enum Gender {
///     Male,
///     Female,
/// }
///
/// yaml_enum!(Gender { Male = "MALE", Female = "FEMALE" });
///
/// let ctx = CoercionContext::default();
/// let gender: Gender = typed_yaml::typed::from_value(&json!("FEMALE"), &ctx, true).unwrap();
/// assert_eq!(gender, Gender::Female);
/// assert!(typed_yaml::typed::from_value::<Gender>(&json!("female"), &ctx, true).is_err());
/// ```
#[macro_export]
macro_rules! yaml_enum {
    ($ty:ident { $($variant:ident = $member:literal),+ $(,)? }) => {
        impl $crate::typed::FromYaml for $ty {
            fn type_descriptor() -> $crate::coerce::TypeDescriptor {
                $crate::coerce::TypeDescriptor::Enum($crate::coerce::EnumDescriptor::new(
                    ::std::stringify!($ty),
                    [$($member),+],
                ))
            }

            fn from_coerced(
                coerced: $crate::coerce::Coerced,
            ) -> $crate::error::Result<Self> {
                match coerced {
                    $crate::coerce::Coerced::Enum { member, .. } => match member.as_str() {
                        $($member => ::std::result::Result::Ok($ty::$variant),)+
                        other => ::std::result::Result::Err($crate::error::Error::enum_mismatch(
                            ::std::stringify!($ty),
                            other,
                        )),
                    },
                    other => ::std::result::Result::Err($crate::typed::unexpected(
                        &other,
                        ::std::stringify!($ty),
                    )),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::context::CoercionContext;
    use crate::error::Error;
    use crate::typed::{FromYaml, from_value};
    use serde_json::json;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Gender {
        Male,
        Female,
    }

    crate::yaml_enum!(Gender {
        Male = "MALE",
        Female = "FEMALE",
    });

    #[derive(Debug, Default, PartialEq)]
    struct Pet {
        name: Option<String>,
        kind: Option<String>,
    }

    crate::yaml_record!(Pet { name, kind as "type" });

    #[derive(Debug, Default, PartialEq)]
    struct Person {
        name: String,
        nick_name: Option<String>,
        age: Option<i32>,
        gender: Option<Gender>,
        pets: Option<Vec<Pet>>,
        children: Vec<Person>,
        ignored: Option<String>,
    }

    crate::yaml_record!(Person {
        name,
        nick_name as "nickName" alias "nick-name",
        age,
        gender,
        pets,
        children,
    });

    #[derive(Debug, Default)]
    struct Counter {
        count: i32,
    }

    crate::yaml_record!(Counter { count });

    fn ctx() -> CoercionContext {
        CoercionContext::default()
    }

    #[test]
    fn test_record_from_map() {
        let value = json!({
            "name": "Ahmed",
            "nickName": "Ahmed",
            "nick-name": "Abo Salah",
            "age": "30",
            "gender": "MALE",
            "ignored": "never read",
            "pets": [{"name": "Rex", "type": "dog"}],
            "children": [{"name": "Sara", "gender": "FEMALE"}],
        });
        let person: Person = from_value(&value, &ctx(), true).unwrap();

        assert_eq!(person.name, "Ahmed");
        assert_eq!(person.nick_name.as_deref(), Some("Abo Salah"));
        assert_eq!(person.age, Some(30));
        assert_eq!(person.gender, Some(Gender::Male));
        assert_eq!(person.ignored, None);
        assert_eq!(
            person.pets,
            Some(vec![Pet {
                name: Some("Rex".into()),
                kind: Some("dog".into())
            }])
        );
        assert_eq!(person.children.len(), 1);
        assert_eq!(person.children[0].name, "Sara");
        assert_eq!(person.children[0].gender, Some(Gender::Female));
    }

    #[test]
    fn test_record_null_keeps_default() {
        let person: Person = from_value(&json!({"name": null, "age": null}), &ctx(), true).unwrap();
        assert_eq!(person, Person::default());
    }

    #[test]
    fn test_record_enum_failure() {
        let err = from_value::<Person>(&json!({"gender": "MMM"}), &ctx(), true).unwrap_err();
        assert!(matches!(err.innermost(), Error::Enum { enum_name, .. } if enum_name == "Gender"));
    }

    #[test]
    fn test_record_with_primitive_field_rejected() {
        let err = from_value::<Counter>(&json!({"count": 1}), &ctx(), true).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        assert!(from_value::<Vec<Counter>>(&json!([]), &ctx(), true).is_err());
    }

    #[test]
    fn test_record_overlay() {
        let ctx = CoercionContext::builder().environments(["prod", "dev"]).build();
        let value = json!({"name": "base", "name@dev": "dev", "name@prod": "prod"});

        let person: Person = from_value(&value, &ctx, true).unwrap();
        assert_eq!(person.name, "prod");

        let person: Person = from_value(&value, &ctx, false).unwrap();
        assert_eq!(person.name, "base");
    }

    #[test]
    fn test_record_descriptor_lists_keys() {
        let crate::coerce::TypeDescriptor::Record(record) = Person::type_descriptor() else {
            panic!("expected record descriptor");
        };
        let fields = record.fields();
        let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["name", "nickName", "age", "gender", "pets", "children"]);
        assert_eq!(fields[1].alias.as_deref(), Some("nick-name"));
        assert!(!fields[0].nullable);
        assert!(fields[2].nullable);
    }

    #[test]
    fn test_enum_list() {
        let genders: Vec<Gender> = from_value(&json!(["MALE", "FEMALE"]), &ctx(), true).unwrap();
        assert_eq!(genders, vec![Gender::Male, Gender::Female]);
    }
}
