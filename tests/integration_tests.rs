use responders::{
    respond, value, CollectionResponseConverter, Construct, Field, LazyLoader, Node, Options,
    PreMarshaller, Respond, Response, ResponseConverter, ResponseElementConverter, Serde, Shape,
    Struct, Value,
};
use serde::Serialize;
use std::cell::{Cell, OnceCell};
use std::collections::HashMap;
use std::fmt;

struct Base {
    name: String,
    created: String,
}

impl Respond for Base {
    fn shape(&self) -> Shape<'_> {
        Shape::Struct(
            Struct::new("Base")
                .field(Field::new("Name", &self.name))
                .field(Field::new("Created", &self.created).json("created_at")),
        )
    }
}

struct Outer {
    name: String,
    base: Base,
}

impl Respond for Outer {
    fn shape(&self) -> Shape<'_> {
        Shape::Struct(
            Struct::new("Outer")
                .field(Field::new("Name", &self.name))
                .field(Field::embedded("Base", &self.base)),
        )
    }
}

struct Tagged {
    both: i32,
    json_only: i32,
    json_dash: i32,
    hidden: i32,
    hidden_by_json: i32,
}

impl Respond for Tagged {
    fn shape(&self) -> Shape<'_> {
        Shape::Struct(
            Struct::new("Tagged")
                .field(Field::new("Both", &self.both).response("foo").json("bar"))
                .field(Field::new("JsonOnly", &self.json_only).json("bar"))
                .field(Field::new("JsonDash", &self.json_dash).json("-"))
                .field(Field::new("Hidden", &self.hidden).response("-"))
                .field(Field::new("HiddenByJson", &self.hidden_by_json).response("-").json("x")),
        )
    }
}

#[derive(Debug)]
struct Status(&'static str);

impl Respond for Status {
    fn shape(&self) -> Shape<'_> {
        Shape::Leaf(Value::from(self.0))
    }

    fn nil_element_data() -> Option<Node<'static>> {
        Some(Node::value("N/A"))
    }
}

struct Ticket {
    status: Option<Status>,
    assignee: Option<String>,
}

impl Respond for Ticket {
    fn shape(&self) -> Shape<'_> {
        Shape::Struct(
            Struct::new("Ticket")
                .field(Field::new("Status", &self.status))
                .field(Field::new("Assignee", &self.assignee)),
        )
    }
}

#[test]
fn test_output_is_idempotent() {
    let calls = Cell::new(0);
    let data = vec![1, 2];
    let response = Response::new(&data).with_constructor(|data, _| {
        calls.set(calls.get() + 1);
        Construct::descend(data)
    });

    let first = response.output();
    let second = response.output();
    assert!(std::ptr::eq(first, second));
    // root plus two elements, computed once
    assert_eq!(calls.get(), 3);
}

#[test]
fn test_field_name_precedence() {
    let data = Tagged {
        both: 1,
        json_only: 2,
        json_dash: 3,
        hidden: 4,
        hidden_by_json: 5,
    };
    let output = respond(&data);

    assert_eq!(output.get("foo"), Some(&Value::from(1)));
    assert_eq!(output.get("bar"), Some(&Value::from(2)));
    assert_eq!(output.get("jsondash"), Some(&Value::from(3)));
    assert_eq!(output.as_object().map(|o| o.len()), Some(3));
}

#[test]
fn test_excluded_fields_never_appear() {
    let data = Tagged {
        both: 1,
        json_only: 2,
        json_dash: 3,
        hidden: 4,
        hidden_by_json: 5,
    };
    let output = respond(&data);
    assert!(output.get("hidden").is_none());
    assert!(output.get("hiddenbyjson").is_none());
    assert!(output.get("x").is_none());
    assert!(output.get("-").is_none());
}

#[test]
fn test_embedded_merge_outer_wins() {
    let data = Outer {
        name: "Outer".into(),
        base: Base {
            name: "Inner".into(),
            created: "2024".into(),
        },
    };
    assert_eq!(
        respond(&data),
        value!({ "name": "Outer", "created_at": "2024" })
    );
}

#[test]
fn test_embedded_does_not_overwrite_later_outer_keys() {
    struct Late {
        base: Base,
        name: String,
    }

    impl Respond for Late {
        fn shape(&self) -> Shape<'_> {
            Shape::Struct(
                Struct::new("Late")
                    .field(Field::embedded("Base", &self.base))
                    .field(Field::new("Name", &self.name)),
            )
        }
    }

    let data = Late {
        base: Base {
            name: "Inner".into(),
            created: "2024".into(),
        },
        name: "Outer".into(),
    };
    // a regular field set after the merge still writes its own key
    assert_eq!(respond(&data).get("name"), Some(&Value::from("Outer")));
}

#[test]
fn test_nullable_wrapper() {
    struct NullInt {
        int: i64,
        valid: bool,
    }

    impl Respond for NullInt {
        fn shape(&self) -> Shape<'_> {
            Shape::Struct(
                Struct::new("NullInt")
                    .field(Field::new("Int", &self.int))
                    .field(Field::new("Valid", &self.valid)),
            )
        }
    }

    assert_eq!(respond(&NullInt { int: 5, valid: true }), Value::from(5));
    assert_eq!(respond(&NullInt { int: 5, valid: false }), Value::Null);

    let nested = vec![vec![NullInt { int: 1, valid: true }, NullInt { int: 2, valid: false }]];
    assert_eq!(respond(&nested), value!([[1, null]]));
}

#[test]
fn test_null_substitution() {
    let data = Ticket {
        status: None,
        assignee: None,
    };
    assert_eq!(
        respond(&data),
        value!({ "status": "N/A", "assignee": null })
    );

    let data = Ticket {
        status: Some(Status("open")),
        assignee: Some("ada".into()),
    };
    assert_eq!(
        respond(&data),
        value!({ "status": "open", "assignee": "ada" })
    );
}

#[test]
fn test_root_collection_converter() {
    struct Item {
        id: u32,
        dispatched: Cell<bool>,
    }

    impl Respond for Item {
        fn shape(&self) -> Shape<'_> {
            Shape::Leaf(Value::from(self.id))
        }

        fn as_collection_converter(&self) -> Option<&dyn CollectionResponseConverter> {
            Some(self)
        }
    }

    impl CollectionResponseConverter for Item {
        fn collection_response(&self) -> Node<'_> {
            self.dispatched.set(true);
            Node::value(value!({ "href": (format!("/items/{}", self.id)) }))
        }
    }

    let data: Vec<Item> = (1..=3)
        .map(|id| Item {
            id,
            dispatched: Cell::new(false),
        })
        .collect();
    let depths = std::cell::RefCell::new(Vec::new());
    let response = Response::new(&data).with_constructor(|data, depth| {
        depths.borrow_mut().push(depth);
        Construct::descend(data)
    });

    assert_eq!(
        response.output(),
        &value!([
            { "href": "/items/1" },
            { "href": "/items/2" },
            { "href": "/items/3" }
        ])
    );
    assert!(data.iter().all(|item| item.dispatched.get()));
    // every converted element and its href went through the dispatcher
    assert_eq!(*depths.borrow(), vec![0, 1, 2, 1, 2, 1, 2]);
}

#[test]
fn test_conditional_inclusion_any_condition_matches() {
    struct Member {
        email: String,
        phone: String,
    }

    impl Respond for Member {
        fn shape(&self) -> Shape<'_> {
            Shape::Struct(
                Struct::new("Member")
                    .field(Field::new("Email", &self.email).cond("admin,user"))
                    .field(Field::new("Phone", &self.phone).cond("user")),
            )
        }
    }

    let checked = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
    let log = checked.clone();
    let options = Options::new().with_inclusion(move |condition| {
        if let Ok(mut log) = log.lock() {
            log.push(condition.to_string());
        }
        condition == "admin"
    });
    let data = Member {
        email: "a@b.c".into(),
        phone: "555".into(),
    };

    let output = Response::new(&data).with_options(options).into_output();
    assert_eq!(output, value!({ "email": "a@b.c" }));
    // evaluation stops at the first matching condition
    assert_eq!(*checked.lock().unwrap(), vec!["admin", "user"]);
}

#[test]
fn test_error_short_circuit() {
    #[derive(Debug)]
    struct NotFound {
        resource: String,
    }

    impl fmt::Display for NotFound {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{} not found", self.resource)
        }
    }

    impl std::error::Error for NotFound {}

    impl Respond for NotFound {
        fn shape(&self) -> Shape<'_> {
            Shape::Struct(Struct::new("NotFound").field(Field::new("Resource", &self.resource)))
        }

        fn as_error(&self) -> Option<&dyn std::error::Error> {
            Some(self)
        }
    }

    let data = NotFound {
        resource: "user".into(),
    };
    let fixed = Cell::new(false);
    let response = Response::new(&data).with_fixer(|value| {
        fixed.set(true);
        value
    });
    assert_eq!(response.output(), &Value::from("user not found"));
    assert!(!fixed.get());

    // nested errors render through the dispatcher instead
    let nested = vec![vec![NotFound {
        resource: "post".into(),
    }]];
    assert_eq!(respond(&nested), value!([["post not found"]]));
}

#[test]
fn test_lazy_loader_runs_before_constructor() {
    struct Profile {
        bio: OnceCell<String>,
    }

    impl LazyLoader for Profile {
        fn lazy_load(&self, options: &Options) {
            let lang = options.get("lang").and_then(Value::as_str).unwrap_or("en");
            let _ = self.bio.set(format!("bio ({})", lang));
        }
    }

    impl Respond for Profile {
        fn shape(&self) -> Shape<'_> {
            match self.bio.get() {
                Some(bio) => Shape::Leaf(Value::from(bio.as_str())),
                None => Shape::Leaf(Value::Null),
            }
        }

        fn as_lazy_loader(&self) -> Option<&dyn LazyLoader> {
            Some(self)
        }
    }

    let data = Profile {
        bio: OnceCell::new(),
    };
    let loaded_first = Cell::new(false);
    let response = Response::new(&data)
        .with_options(Options::new().with_param("lang", "fr"))
        .with_constructor(|data, _| {
            loaded_first.set(!matches!(data.shape(), Shape::Leaf(Value::Null)));
            Construct::descend(data)
        });

    assert_eq!(response.output(), &Value::from("bio (fr)"));
    assert!(loaded_first.get());
}

#[test]
fn test_pre_marshal_runs_once_on_root() {
    struct Page {
        items: Vec<i32>,
        prepared: Cell<u32>,
    }

    impl PreMarshaller for Page {
        fn pre_marshal(&self) {
            self.prepared.set(self.prepared.get() + 1);
        }
    }

    impl Respond for Page {
        fn shape(&self) -> Shape<'_> {
            Shape::Struct(Struct::new("Page").field(Field::new("Items", &self.items)))
        }

        fn as_pre_marshaller(&self) -> Option<&dyn PreMarshaller> {
            Some(self)
        }
    }

    let data = Page {
        items: vec![1],
        prepared: Cell::new(0),
    };
    {
        let response = Response::new(&data);
        let _ = response.output();
        let _ = response.output();
    }
    assert_eq!(data.prepared.get(), 1);

    let nested = vec![data];
    let _ = respond(&nested);
    assert_eq!(nested[0].prepared.get(), 1);
}

#[test]
fn test_element_converter_only_for_sub_elements() {
    struct Author {
        id: u32,
        name: String,
    }

    impl Respond for Author {
        fn shape(&self) -> Shape<'_> {
            Shape::Struct(
                Struct::new("Author")
                    .field(Field::new("ID", &self.id))
                    .field(Field::new("Name", &self.name)),
            )
        }

        fn as_element_converter(&self) -> Option<&dyn ResponseElementConverter> {
            Some(self)
        }
    }

    impl ResponseElementConverter for Author {
        fn response_element_data(&self, _options: &Options) -> Node<'_> {
            Node::value(format!("/authors/{}", self.id))
        }
    }

    struct Book {
        title: String,
        author: Author,
    }

    impl Respond for Book {
        fn shape(&self) -> Shape<'_> {
            Shape::Struct(
                Struct::new("Book")
                    .field(Field::new("Title", &self.title))
                    .field(Field::new("Author", &self.author)),
            )
        }
    }

    let author = Author {
        id: 9,
        name: "Le Guin".into(),
    };
    assert_eq!(respond(&author), value!({ "id": 9, "name": "Le Guin" }));

    let roots = vec![Author {
        id: 9,
        name: "Le Guin".into(),
    }];
    assert_eq!(respond(&roots), value!([{ "id": 9, "name": "Le Guin" }]));

    let book = Book {
        title: "Earthsea".into(),
        author,
    };
    assert_eq!(
        respond(&book),
        value!({ "title": "Earthsea", "author": "/authors/9" })
    );
}

#[test]
fn test_whole_value_converter_at_every_level() {
    struct Money {
        cents: i64,
    }

    impl Respond for Money {
        fn shape(&self) -> Shape<'_> {
            Shape::Leaf(Value::from(self.cents))
        }

        fn as_response_converter(&self) -> Option<&dyn ResponseConverter> {
            Some(self)
        }
    }

    impl ResponseConverter for Money {
        fn response_data(&self) -> Node<'_> {
            Node::value(value!({
                "amount": (self.cents as f64 / 100.0),
                "currency": "EUR"
            }))
        }
    }

    let root = Money { cents: 250 };
    assert_eq!(
        respond(&root),
        value!({ "amount": 2.5, "currency": "EUR" })
    );

    let mut prices = HashMap::new();
    prices.insert("tea".to_string(), Money { cents: 300 });
    assert_eq!(
        respond(&prices),
        value!({ "tea": { "amount": 3.0, "currency": "EUR" } })
    );
}

#[test]
fn test_serde_bridge_and_json_hand_off() {
    #[derive(Serialize)]
    struct Coordinates {
        lat: f64,
        lng: f64,
    }

    struct Place {
        name: String,
        location: Serde<Coordinates>,
    }

    impl Respond for Place {
        fn shape(&self) -> Shape<'_> {
            Shape::Struct(
                Struct::new("Place")
                    .field(Field::new("Name", &self.name))
                    .field(Field::new("Location", &self.location)),
            )
        }
    }

    let data = Place {
        name: "Harbor".into(),
        location: Serde(Coordinates { lat: 1.5, lng: -2.25 }),
    };
    let output = respond(&data);
    assert_eq!(
        serde_json::to_value(&output).unwrap(),
        serde_json::json!({ "name": "Harbor", "location": { "lat": 1.5, "lng": -2.25 } })
    );
}

#[test]
fn test_fixer_sees_every_subtree() {
    let data = vec![vec![1.0, 2.5]];
    let response = Response::new(&data).with_fixer(|value| match value {
        Value::Number(n) if n.is_float() && n.as_f64().fract() == 0.0 => Value::from(n.as_f64() as i64),
        other => other,
    });
    assert_eq!(response.output(), &value!([[1, 2.5]]));
}

#[test]
fn test_large_unsigned_leaves_encode_exactly() {
    let output = respond(&vec![u64::MAX, 1]);
    assert_eq!(
        serde_json::to_string(&output).unwrap(),
        "[18446744073709551615,1]"
    );

    let ids: Vec<usize> = vec![usize::MAX];
    assert_eq!(respond(&ids), value!([(usize::MAX as u64)]));
}
