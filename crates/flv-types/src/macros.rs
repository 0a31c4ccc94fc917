// ── Macro for open bit-field enums ────────────────────────────────────
//
// Most FLV enums name only some of the values their bit field can hold.
// Decoding is lenient: a value without a name becomes `Unknown(bits)`
// instead of failing the whole tag, and `to_bits` gives it back
// unchanged. The macro keeps the value table and the display labels in
// one place at each call site.

macro_rules! open_enum {
  (
    $(#[$meta:meta])*
    pub enum $name:ident {
      $( $(#[$vmeta:meta])* $variant:ident = $bits:literal => $label:literal ),+ $(,)?
    }
  ) => {
    $(#[$meta])*
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub enum $name {
      $( $(#[$vmeta])* $variant, )+
      /// A value with no assigned meaning. Holds the raw bits.
      Unknown(u8),
    }

    impl $name {
      /// Decode the raw field bits.
      #[must_use]
      pub fn from_bits(value: u8) -> Self {
        match value {
          $( $bits => Self::$variant, )+
          other => Self::Unknown(other),
        }
      }

      /// The raw field bits for this value.
      #[must_use]
      pub fn to_bits(self) -> u8 {
        match self {
          $( Self::$variant => $bits, )+
          Self::Unknown(other) => other,
        }
      }
    }

    impl std::fmt::Display for $name {
      fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
          $( Self::$variant => f.write_str($label), )+
          Self::Unknown(other) => write!(f, "unknown({other})"),
        }
      }
    }
  };
}
