//! Member and accessor planning.

use recgen_schema::{Field, Record};

/// How a field is stored in the generated type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Storage {
    /// May be reassigned after construction.
    Reassignable,
    /// Initialized once by a constructor.
    InitOnce,
}

/// Accessors generated for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accessor {
    /// Whether a setter is generated. A getter always is.
    pub setter: bool,
    /// Whether the setter takes its value by reference.
    pub setter_by_reference: bool,
}

/// Storage and accessors of one field.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberSlot<'a> {
    /// The field.
    pub field: &'a Field,
    /// Storage class.
    pub storage: Storage,
    /// Accessors.
    pub accessor: Accessor,
}

/// Value-semantics special members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialMember {
    /// Copy constructor.
    CopyConstructor,
    /// Move constructor.
    MoveConstructor,
    /// Copy assignment.
    CopyAssign,
    /// Move assignment.
    MoveAssign,
    /// Destructor.
    Destructor,
}

/// Special members every record gets, each defaulted member-wise.
pub const VALUE_SEMANTICS: [SpecialMember; 5] = [
    SpecialMember::CopyConstructor,
    SpecialMember::MoveConstructor,
    SpecialMember::CopyAssign,
    SpecialMember::MoveAssign,
    SpecialMember::Destructor,
];

/// Member layout and accessors of a record.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberPlan<'a> {
    /// One slot per field, in declaration order.
    pub slots: Vec<MemberSlot<'a>>,
    /// Boilerplate special members.
    pub special_members: &'static [SpecialMember],
}

impl MemberPlan<'_> {
    /// Returns the number of setters in the plan.
    #[must_use]
    pub fn setter_count(&self) -> usize {
        self.slots.iter().filter(|s| s.accessor.setter).count()
    }
}

/// Plans storage and accessors for every field of a record.
#[must_use]
pub fn plan_members(record: &Record) -> MemberPlan<'_> {
    let slots = record
        .fields
        .iter()
        .map(|field| {
            let mutable = field.is_mutable();
            MemberSlot {
                field,
                storage: if mutable {
                    Storage::Reassignable
                } else {
                    Storage::InitOnce
                },
                accessor: Accessor {
                    setter: mutable,
                    setter_by_reference: mutable && !field.ty.is_trivial(),
                },
            }
        })
        .collect();

    MemberPlan {
        slots,
        special_members: &VALUE_SEMANTICS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recgen_schema::FieldType;

    #[test]
    fn test_immutable_field_is_getter_only() {
        let record = Record::new("Foo", "foo.xml")
            .with_field(Field::new("meow", FieldType::parse("int64")).immutable())
            .with_field(Field::new("hello", FieldType::parse("string")))
            .with_field(Field::new("isTrue", FieldType::parse("bool")));
        let plan = plan_members(&record);

        assert_eq!(plan.slots[0].storage, Storage::InitOnce);
        assert!(!plan.slots[0].accessor.setter);
        assert_eq!(plan.slots[1].storage, Storage::Reassignable);
        assert!(plan.slots[1].accessor.setter);
        assert_eq!(plan.setter_count(), 2);
    }

    #[test]
    fn test_setter_by_reference_for_non_trivial() {
        let record = Record::new("Person", "person.xml")
            .with_field(Field::new("name", FieldType::parse("string")))
            .with_field(Field::new("age", FieldType::parse("int32")))
            .with_field(Field::new("nickname", FieldType::parse("string")).optional());
        let plan = plan_members(&record);

        assert!(plan.slots[0].accessor.setter_by_reference);
        assert!(!plan.slots[1].accessor.setter_by_reference);
        assert!(plan.slots[2].accessor.setter_by_reference);
    }

    #[test]
    fn test_slots_follow_declaration_order() {
        let record = Record::new("Point", "point.xml")
            .with_field(Field::new("y", FieldType::parse("double")))
            .with_field(Field::new("x", FieldType::parse("double")));
        let plan = plan_members(&record);

        let names: Vec<_> = plan.slots.iter().map(|s| s.field.name.as_str()).collect();
        assert_eq!(names, vec!["y", "x"]);
        assert_eq!(plan.special_members.len(), 5);
    }
}
